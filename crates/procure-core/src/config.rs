//! 引擎配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ProcureError, Result};

/// 採購引擎參數配置
///
/// 所有數值門檻皆為配置而非常數；配置錯誤使整個週期失敗（fail closed）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 回溯視窗（天）
    pub trailing_window_days: u32,

    /// 彙總期間長度（天）
    pub period_days: u32,

    /// 最少完整期間數（低於此數回報 InsufficientHistory）
    pub min_history_periods: u32,

    /// 預設日耗用率（歷史不足時的回退值；未配置時歷史不足即失敗）
    pub default_daily_rate: Option<Decimal>,

    /// 高信心變異係數門檻（期間波動低於此值時信心為 High）
    pub cv_high_confidence: Decimal,

    /// 充足性檢查時界（天）
    pub sufficiency_horizon_days: u32,

    /// 標準交貨緩衝（天）
    pub standard_delivery_buffer_days: u32,

    /// 主供應商自動選用的可靠度門檻（0-1 刻度）
    pub reliability_auto_select: Decimal,

    /// 供應商改善計畫門檻（低於此值觸發劣化警報）
    pub reliability_improvement_floor: Decimal,

    /// 目標年週轉次數（庫存過高判定用）
    pub target_turnover_per_year: Decimal,

    /// 到期批次前瞻（天）
    pub expiration_lookahead_days: u32,

    /// 耗用率除法下限（避免除以零）
    pub consumption_epsilon: Decimal,
}

impl EngineConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            trailing_window_days: 90,
            period_days: 30,
            min_history_periods: 2,
            default_daily_rate: None,
            cv_high_confidence: Decimal::new(25, 2), // 0.25
            sufficiency_horizon_days: 30,
            standard_delivery_buffer_days: 3,
            reliability_auto_select: Decimal::new(8, 1), // 0.8
            reliability_improvement_floor: Decimal::new(7, 1), // 0.7
            target_turnover_per_year: Decimal::from(6),
            expiration_lookahead_days: 14,
            consumption_epsilon: Decimal::new(1, 3), // 0.001
        }
    }

    /// 建構器模式：設置回溯視窗
    pub fn with_trailing_window(mut self, days: u32) -> Self {
        self.trailing_window_days = days;
        self
    }

    /// 建構器模式：設置彙總期間長度
    pub fn with_period_days(mut self, days: u32) -> Self {
        self.period_days = days;
        self
    }

    /// 建構器模式：設置最少完整期間數
    pub fn with_min_history_periods(mut self, periods: u32) -> Self {
        self.min_history_periods = periods;
        self
    }

    /// 建構器模式：設置預設日耗用率
    pub fn with_default_daily_rate(mut self, rate: Decimal) -> Self {
        self.default_daily_rate = Some(rate);
        self
    }

    /// 建構器模式：設置高信心變異係數門檻
    pub fn with_cv_high_confidence(mut self, cv: Decimal) -> Self {
        self.cv_high_confidence = cv;
        self
    }

    /// 建構器模式：設置充足性檢查時界
    pub fn with_sufficiency_horizon(mut self, days: u32) -> Self {
        self.sufficiency_horizon_days = days;
        self
    }

    /// 建構器模式：設置標準交貨緩衝
    pub fn with_delivery_buffer(mut self, days: u32) -> Self {
        self.standard_delivery_buffer_days = days;
        self
    }

    /// 建構器模式：設置可靠度自動選用門檻
    pub fn with_reliability_auto_select(mut self, threshold: Decimal) -> Self {
        self.reliability_auto_select = threshold;
        self
    }

    /// 建構器模式：設置供應商改善門檻
    pub fn with_reliability_improvement_floor(mut self, threshold: Decimal) -> Self {
        self.reliability_improvement_floor = threshold;
        self
    }

    /// 建構器模式：設置目標年週轉次數
    pub fn with_target_turnover(mut self, turns: Decimal) -> Self {
        self.target_turnover_per_year = turns;
        self
    }

    /// 建構器模式：設置到期批次前瞻
    pub fn with_expiration_lookahead(mut self, days: u32) -> Self {
        self.expiration_lookahead_days = days;
        self
    }

    /// 驗證配置
    ///
    /// 任何欄位無效即代表參考資料載入損毀，必須在計算任何決策之前中止
    pub fn validate(&self) -> Result<()> {
        if self.trailing_window_days == 0 {
            return Err(ProcureError::InvalidConfiguration(
                "回溯視窗必須大於零".to_string(),
            ));
        }
        if self.period_days == 0 || self.period_days > self.trailing_window_days {
            return Err(ProcureError::InvalidConfiguration(format!(
                "期間長度無效: {} 天（視窗 {} 天）",
                self.period_days, self.trailing_window_days
            )));
        }
        if self.min_history_periods == 0 {
            return Err(ProcureError::InvalidConfiguration(
                "最少完整期間數必須大於零".to_string(),
            ));
        }
        if self.sufficiency_horizon_days == 0 {
            return Err(ProcureError::InvalidConfiguration(
                "充足性檢查時界必須大於零".to_string(),
            ));
        }
        if self.reliability_auto_select <= Decimal::ZERO
            || self.reliability_auto_select > Decimal::ONE
        {
            return Err(ProcureError::InvalidConfiguration(format!(
                "可靠度門檻必須落在 (0, 1]: {}",
                self.reliability_auto_select
            )));
        }
        if self.reliability_improvement_floor < Decimal::ZERO
            || self.reliability_improvement_floor > Decimal::ONE
        {
            return Err(ProcureError::InvalidConfiguration(format!(
                "改善門檻必須落在 [0, 1]: {}",
                self.reliability_improvement_floor
            )));
        }
        if self.target_turnover_per_year <= Decimal::ZERO {
            return Err(ProcureError::InvalidConfiguration(
                "目標週轉次數必須大於零".to_string(),
            ));
        }
        if self.consumption_epsilon <= Decimal::ZERO {
            return Err(ProcureError::InvalidConfiguration(
                "耗用率下限必須大於零".to_string(),
            ));
        }
        if let Some(rate) = self.default_daily_rate {
            if rate < Decimal::ZERO {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "預設日耗用率不得為負: {}",
                    rate
                )));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
