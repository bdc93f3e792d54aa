//! # Procurement Calculation Engine
//!
//! 需求預測與採購決策計算引擎

pub mod aggregation;
pub mod cycle;
pub mod engine;
pub mod forecaster;
pub mod order_sizing;
pub mod seasonal;
pub mod supplier_select;

// Re-export 主要類型
pub use aggregation::{HistoryAggregator, MaterialHistory, PeriodConsumption};
pub use cycle::{CycleRunner, HistorySource, InMemoryHistory};
pub use engine::{DecisionEngine, DecisionOutcome};
pub use forecaster::DemandForecaster;
pub use order_sizing::OrderSizingCalculator;
pub use seasonal::SeasonalCalculator;
pub use supplier_select::{ProcurementUrgency, SupplierSelector};

/// 決策週期計算結果
#[derive(Debug, Clone)]
pub struct CycleResult {
    /// 採購決策（僅含本週期實際寫入台帳的決策）
    pub decisions: Vec<procure_core::ProcurementDecision>,

    /// 推導警報
    pub alerts: Vec<procure_core::Alert>,

    /// 本週期產生的預測（保留供稽核/回測）
    pub forecasts: Vec<procure_core::Forecast>,

    /// 警告信息
    pub warnings: Vec<CycleWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl CycleResult {
    /// 創建空的計算結果
    pub fn empty() -> Self {
        Self {
            decisions: Vec::new(),
            alerts: Vec::new(),
            forecasts: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: CycleWarning) {
        self.warnings.push(warning);
    }
}

/// 週期警告
#[derive(Debug, Clone)]
pub struct CycleWarning {
    pub material_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl CycleWarning {
    pub fn new(material_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            material_id,
            message,
            severity,
        }
    }

    pub fn info(material_id: String, message: String) -> Self {
        Self::new(material_id, message, WarningSeverity::Info)
    }

    pub fn warning(material_id: String, message: String) -> Self {
        Self::new(material_id, message, WarningSeverity::Warning)
    }

    pub fn error(material_id: String, message: String) -> Self {
        Self::new(material_id, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
