//! 客戶群組與季節模型

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 日曆季度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// 由日期取得季度
    pub fn from_date(date: NaiveDate) -> Self {
        match date.month() {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    /// 季度索引（0-3）
    pub fn index(&self) -> usize {
        match self {
            Quarter::Q1 => 0,
            Quarter::Q2 => 1,
            Quarter::Q3 => 2,
            Quarter::Q4 => 3,
        }
    }
}

/// 客戶群組
///
/// 靜態參考資料：各群組有獨立的季節需求型態
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSegment {
    /// 群組ID
    pub segment_id: String,

    /// 季節乘數表（Q1-Q4）
    pub quarterly_multipliers: [Decimal; 4],

    /// 平均訂單量
    pub average_order_size: Decimal,

    /// 預期交貨提前期（天）
    pub expected_lead_time_days: u32,
}

impl CustomerSegment {
    /// 創建新的客戶群組（預設各季乘數為 1.0）
    pub fn new(segment_id: String) -> Self {
        Self {
            segment_id,
            quarterly_multipliers: [Decimal::ONE; 4],
            average_order_size: Decimal::ZERO,
            expected_lead_time_days: 14,
        }
    }

    /// 建構器模式：設置季節乘數表
    pub fn with_quarterly_multipliers(mut self, multipliers: [Decimal; 4]) -> Self {
        self.quarterly_multipliers = multipliers;
        self
    }

    /// 建構器模式：設置平均訂單量
    pub fn with_average_order_size(mut self, size: Decimal) -> Self {
        self.average_order_size = size;
        self
    }

    /// 建構器模式：設置預期提前期
    pub fn with_expected_lead_time(mut self, days: u32) -> Self {
        self.expected_lead_time_days = days;
        self
    }

    /// 取得指定季度的乘數
    pub fn multiplier(&self, quarter: Quarter) -> Decimal {
        self.quarterly_multipliers[quarter.index()]
    }

    /// 基礎建設群組（旺季在 Q3）
    pub fn infrastructure() -> Self {
        Self::new("infrastructure".to_string()).with_quarterly_multipliers([
            Decimal::new(6, 1),  // 0.6
            Decimal::new(12, 1), // 1.2
            Decimal::new(18, 1), // 1.8
            Decimal::new(4, 1),  // 0.4
        ])
    }

    /// 油氣群組（需求相對平穩）
    pub fn oil_gas() -> Self {
        Self::new("oil-gas".to_string()).with_quarterly_multipliers([
            Decimal::new(12, 1), // 1.2
            Decimal::ONE,        // 1.0
            Decimal::new(8, 1),  // 0.8
            Decimal::ONE,        // 1.0
        ])
    }

    /// 承包商群組
    pub fn contractors() -> Self {
        Self::new("contractors".to_string()).with_quarterly_multipliers([
            Decimal::new(8, 1),  // 0.8
            Decimal::new(11, 1), // 1.1
            Decimal::new(14, 1), // 1.4
            Decimal::new(7, 1),  // 0.7
        ])
    }
}
