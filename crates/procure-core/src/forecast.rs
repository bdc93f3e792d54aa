//! 需求預測模型

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 預測信心水準
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ForecastConfidence {
    /// 歷史不足或使用預設耗用率
    Low,
    /// 歷史充足
    Medium,
    /// 歷史充足且波動低於門檻
    High,
}

/// 需求預測（每次預測週期重新計算；舊預測保留供稽核）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// 預測ID
    pub id: Uuid,

    /// 物料ID
    pub material_id: String,

    /// 預測時界（天）
    pub horizon_days: u32,

    /// 預測基準日
    pub as_of: NaiveDate,

    /// 點估計量
    pub quantity: Decimal,

    /// 基準日耗用率
    pub base_rate: Decimal,

    /// 套用的季節乘數
    pub seasonal_multiplier: Decimal,

    /// 信心水準
    pub confidence: ForecastConfidence,

    /// 參與計算的客戶群組
    pub contributing_segments: Vec<String>,

    /// 產生時間
    pub generated_at: DateTime<Utc>,
}

impl Forecast {
    /// 創建新的預測記錄
    pub fn new(
        material_id: String,
        horizon_days: u32,
        as_of: NaiveDate,
        quantity: Decimal,
        base_rate: Decimal,
        seasonal_multiplier: Decimal,
        confidence: ForecastConfidence,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            material_id,
            horizon_days,
            as_of,
            quantity,
            base_rate,
            seasonal_multiplier,
            confidence,
            contributing_segments: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// 建構器模式：設置參與群組
    pub fn with_contributing_segments(mut self, segments: Vec<String>) -> Self {
        self.contributing_segments = segments;
        self
    }

    /// 預測期間的平均日需求
    pub fn daily_quantity(&self) -> Decimal {
        if self.horizon_days == 0 {
            return Decimal::ZERO;
        }
        self.quantity / Decimal::from(self.horizon_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_forecast() {
        let forecast = Forecast::new(
            "COIL-001".to_string(),
            30,
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            Decimal::from(180),
            Decimal::from(6),
            Decimal::ONE,
            ForecastConfidence::Medium,
        )
        .with_contributing_segments(vec!["infrastructure".to_string()]);

        assert_eq!(forecast.quantity, Decimal::from(180));
        assert_eq!(forecast.daily_quantity(), Decimal::from(6));
        assert_eq!(forecast.contributing_segments.len(), 1);
    }

    #[test]
    fn test_confidence_ordering() {
        // 信心水準可比較（Low < Medium < High）
        assert!(ForecastConfidence::Low < ForecastConfidence::Medium);
        assert!(ForecastConfidence::Medium < ForecastConfidence::High);
    }
}
