//! # Procure
//!
//! 鋼捲加工供應鏈的需求預測與採購決策引擎
//!
//! 由耗用歷史推導季節調整後的需求預測，對每個物料執行固定順序的
//! 決策樹（充足性 → 緊急度 → 供應商 → 訂購量），產出可稽核的
//! 採購決策與警報。引擎為純計算層，不直接下單。
//!
//! ## 快速開始
//!
//! ```no_run
//! use procure::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let mut registry = ProcurementRegistry::new(1);
//! registry.add_material(Material::new(
//!     "COIL-001".to_string(),
//!     MaterialCategory::CoilStock,
//!     "ton".to_string(),
//! ));
//! registry.add_supplier(
//!     Supplier::new("VENDOR-01".to_string(), 14)
//!         .with_categories(vec![MaterialCategory::CoilStock])
//!         .with_unit_price(Decimal::from(500)),
//! );
//! registry.set_primary("COIL-001", "VENDOR-01");
//!
//! let runner = CycleRunner::new(
//!     EngineConfig::new(),
//!     registry,
//!     vec![CustomerSegment::infrastructure()],
//! );
//! ```

pub use procure_calc as calc;
pub use procure_core as core;
pub use procure_emit as emit;

pub mod telemetry;

/// 常用類型的一次性引入
pub mod prelude {
    pub use procure_calc::{
        CycleResult, CycleRunner, DecisionEngine, DemandForecaster, HistoryAggregator,
        HistorySource, InMemoryHistory, OrderSizingCalculator, SeasonalCalculator,
        SupplierSelector,
    };
    pub use procure_core::{
        Alert, AlertKind, AlertSeverity, ConsumptionRecord, CustomerSegment, DecisionClass,
        DecisionLedger, EngineConfig, ExpiringLot, Forecast, ForecastConfidence, InventoryRecord,
        InventoryStore, Material, MaterialCategory, ProcureError, ProcurementDecision,
        ProcurementRegistry, Supplier,
    };
    pub use procure_emit::{EmitSink, Emitter, LogSink};
}
