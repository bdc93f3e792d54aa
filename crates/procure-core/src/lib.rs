//! # Procure Core
//!
//! 核心資料模型與類型定義

pub mod alert;
pub mod config;
pub mod decision;
pub mod forecast;
pub mod history;
pub mod inventory;
pub mod material;
pub mod registry;
pub mod segment;
pub mod supplier;

// Re-export 主要類型
pub use alert::{Alert, AlertKind, AlertSeverity};
pub use config::EngineConfig;
pub use decision::{DecisionClass, DecisionLedger, DecisionState, LedgerOutcome, ProcurementDecision};
pub use forecast::{Forecast, ForecastConfidence};
pub use history::ConsumptionRecord;
pub use inventory::{ExpiringLot, InventoryEvent, InventoryEventType, InventoryRecord, InventoryStore};
pub use material::{Material, MaterialCategory};
pub use registry::ProcurementRegistry;
pub use segment::{CustomerSegment, Quarter};
pub use supplier::Supplier;

/// 採購引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum ProcureError {
    #[error("歷史資料不足: {0}")]
    InsufficientHistory(String),

    #[error("資料暫時無法取得: {0}")]
    DataUnavailable(String),

    #[error("找不到合格供應商: {0}")]
    NoEligibleSupplier(String),

    #[error("缺少庫存狀態: {0}")]
    MissingInventoryState(String),

    #[error("配置無效: {0}")]
    InvalidConfiguration(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

impl ProcureError {
    /// 檢查是否為單一物料層級的錯誤（不影響整個週期）
    pub fn is_material_scoped(&self) -> bool {
        !matches!(self, ProcureError::InvalidConfiguration(_))
    }
}

pub type Result<T> = std::result::Result<T, ProcureError>;
