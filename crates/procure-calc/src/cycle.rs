//! 決策週期執行

use chrono::NaiveDate;
use procure_core::{
    Alert, AlertKind, AlertSeverity, ConsumptionRecord, CustomerSegment, DecisionLedger,
    EngineConfig, ExpiringLot, InventoryStore, LedgerOutcome, ProcureError, ProcurementRegistry,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::engine::{DecisionEngine, DecisionOutcome};
use crate::{CycleResult, CycleWarning};

/// 耗用歷史來源
///
/// 取得失敗時回傳 `DataUnavailable`，該物料本週期跳過（不產生降級決策）
pub trait HistorySource: Send + Sync {
    fn fetch(&self, material_id: &str) -> procure_core::Result<Vec<ConsumptionRecord>>;
}

/// 記憶體內的歷史來源（測試與批次回放用）
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    records: Vec<ConsumptionRecord>,
}

impl InMemoryHistory {
    /// 創建空的歷史來源
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// 添加耗用記錄
    pub fn push(&mut self, record: ConsumptionRecord) {
        self.records.push(record);
    }
}

impl HistorySource for InMemoryHistory {
    fn fetch(&self, material_id: &str) -> procure_core::Result<Vec<ConsumptionRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.material_id == material_id)
            .cloned()
            .collect())
    }
}

/// 決策週期執行器
///
/// 對註冊表內全部物料並行執行決策樹；
/// 單一物料失敗不中斷其餘物料，配置錯誤則整個週期失敗
pub struct CycleRunner {
    config: EngineConfig,
    registry: ProcurementRegistry,
    engine: DecisionEngine,
}

impl CycleRunner {
    /// 創建週期執行器
    pub fn new(
        config: EngineConfig,
        registry: ProcurementRegistry,
        segments: Vec<CustomerSegment>,
    ) -> Self {
        let engine = DecisionEngine::new(config.clone(), segments);
        Self {
            config,
            registry,
            engine,
        }
    }

    /// 執行一個決策週期
    pub fn run(
        &self,
        inventory: &InventoryStore,
        history: &dyn HistorySource,
        ledger: &mut DecisionLedger,
        expiring_lots: &[ExpiringLot],
        as_of: NaiveDate,
    ) -> procure_core::Result<CycleResult> {
        let start = std::time::Instant::now();

        // 配置或主檔損毀時在計算任何決策之前中止
        self.config.validate()?;
        self.registry.validate()?;

        // 週期內只取一次庫存快照
        let snapshot = inventory.snapshot();
        let material_ids = self.registry.material_ids();
        info!(materials = material_ids.len(), %as_of, "決策週期開始");

        // 各物料獨立，並行評估
        let evaluations: Vec<(String, procure_core::Result<DecisionOutcome>)> = material_ids
            .par_iter()
            .map(|material_id| {
                let outcome = history
                    .fetch(material_id)
                    .and_then(|records| {
                        self.engine.evaluate_material(
                            &self.registry,
                            material_id,
                            &snapshot,
                            &records,
                            expiring_lots,
                            as_of,
                        )
                    });
                (material_id.clone(), outcome)
            })
            .collect();

        // 台帳寫入維持單一寫入者，依物料ID順序循序套用
        let mut result = CycleResult::empty();
        for (material_id, evaluation) in evaluations {
            match evaluation {
                Ok(outcome) => {
                    result.alerts.extend(outcome.alerts);
                    result.forecasts.extend(outcome.forecasts);

                    let class = outcome.decision.class;
                    match ledger.record(outcome.decision) {
                        LedgerOutcome::KeptExisting => {
                            result.add_warning(CycleWarning::info(
                                material_id,
                                format!("既有決策層級較高，{:?} 未寫入", class),
                            ));
                        }
                        _ => {
                            if let Some(decision) = ledger.open_decision(&material_id) {
                                result.decisions.push(decision.clone());
                            }
                        }
                    }
                }
                Err(e) if !e.is_material_scoped() => return Err(e),
                Err(ProcureError::DataUnavailable(reason)) => {
                    // 資料暫時缺席：跳過本週期，不以壞資料產生決策
                    warn!(material_id = %material_id, reason = %reason, "歷史資料無法取得，跳過");
                    result.add_warning(CycleWarning::info(
                        material_id,
                        format!("歷史資料無法取得，本週期跳過: {}", reason),
                    ));
                }
                Err(ProcureError::NoEligibleSupplier(reason)) => {
                    warn!(material_id = %material_id, reason = %reason, "無合格供應商");
                    result.alerts.push(Alert::new(
                        material_id.clone(),
                        AlertKind::SupplierDegradation,
                        AlertSeverity::High,
                        Decimal::ZERO,
                        Decimal::ONE,
                        format!("無合格供應商: {}", reason),
                    ));
                    result.add_warning(CycleWarning::error(material_id, reason));
                }
                Err(ProcureError::InsufficientHistory(reason)) => {
                    result.add_warning(CycleWarning::warning(material_id, reason));
                }
                Err(e) => {
                    warn!(material_id = %material_id, error = %e, "物料評估失敗");
                    result.add_warning(CycleWarning::error(material_id, e.to_string()));
                }
            }
        }

        result.calculation_time_ms = Some(start.elapsed().as_millis());
        info!(
            decisions = result.decisions.len(),
            alerts = result.alerts.len(),
            warnings = result.warnings.len(),
            "決策週期完成"
        );

        Ok(result)
    }
}
