//! 端對端整合測試：完整決策週期

use chrono::{NaiveDate, TimeZone, Utc};
use procure::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use std::sync::Mutex;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 30).unwrap()
}

/// 穩定耗用歷史：三個期間各 30 → 基準耗用率 1.0/天
fn steady_history(material_ids: &[&str]) -> InMemoryHistory {
    let mut history = InMemoryHistory::new();
    for material_id in material_ids {
        for (m, d) in [(5, 10), (6, 10), (7, 10)] {
            history.push(ConsumptionRecord::new(
                material_id.to_string(),
                "infrastructure".to_string(),
                Decimal::from(30),
                Utc.with_ymd_and_hms(2025, m, d, 12, 0, 0).unwrap(),
            ));
        }
    }
    history
}

fn single_material_registry() -> ProcurementRegistry {
    let mut registry = ProcurementRegistry::new(1);
    registry.add_material(Material::new(
        "COIL-001".to_string(),
        MaterialCategory::CoilStock,
        "ton".to_string(),
    ));
    registry.add_supplier(
        Supplier::new("VENDOR-01".to_string(), 14)
            .with_categories(vec![MaterialCategory::CoilStock])
            .with_reliability(Decimal::new(9, 1))
            .with_unit_price(Decimal::from(500)),
    );
    registry.set_primary("COIL-001", "VENDOR-01");
    registry
}

fn single_material_runner() -> CycleRunner {
    CycleRunner::new(
        EngineConfig::new(),
        single_material_registry(),
        vec![CustomerSegment::infrastructure()],
    )
}

fn store_with(entries: &[(&str, i64)]) -> InventoryStore {
    let mut store = InventoryStore::new();
    for (material_id, stock) in entries {
        store.upsert(InventoryRecord::new(
            material_id.to_string(),
            Decimal::from(*stock),
        ));
    }
    store
}

#[test]
fn test_full_cycle_end_to_end() {
    // 步驟 1: 建立主檔（三個物料、各自的供應商）
    let mut registry = ProcurementRegistry::new(1);
    for (id, category, unit) in [
        ("COIL-001", MaterialCategory::CoilStock, "ton"),
        ("COAT-001", MaterialCategory::Coating, "kg"),
        ("CONS-001", MaterialCategory::Consumable, "pcs"),
    ] {
        registry.add_material(Material::new(
            id.to_string(),
            category,
            unit.to_string(),
        ));
    }
    registry.add_supplier(
        Supplier::new("VENDOR-STEEL".to_string(), 14)
            .with_categories(vec![MaterialCategory::CoilStock])
            .with_unit_price(Decimal::from(500)),
    );
    registry.add_supplier(
        Supplier::new("VENDOR-CHEM".to_string(), 10)
            .with_categories(vec![MaterialCategory::Coating])
            .with_unit_price(Decimal::from(12)),
    );
    registry.add_supplier(
        Supplier::new("VENDOR-MISC".to_string(), 14)
            .with_categories(vec![MaterialCategory::Consumable])
            .with_unit_price(Decimal::from(8)),
    );
    registry.set_primary("COIL-001", "VENDOR-STEEL");
    registry.set_primary("COAT-001", "VENDOR-CHEM");
    registry.set_primary("CONS-001", "VENDOR-MISC");

    // 步驟 2: 庫存狀態（低、充足、中等三種水位）
    let store = store_with(&[("COIL-001", 10), ("COAT-001", 56), ("CONS-001", 40)]);

    // 步驟 3: 執行決策週期
    let runner = CycleRunner::new(
        EngineConfig::new(),
        registry,
        vec![CustomerSegment::infrastructure()],
    );
    let history = steady_history(&["COIL-001", "COAT-001", "CONS-001"]);
    let mut ledger = DecisionLedger::new();
    let result = runner
        .run(&store, &history, &mut ledger, &[], as_of())
        .unwrap();

    // 步驟 4: 驗證決策分類
    assert_eq!(result.decisions.len(), 3);
    let class_of = |id: &str| {
        result
            .decisions
            .iter()
            .find(|d| d.material_id == id)
            .unwrap()
            .class
    };
    // 剩餘 10 天 < 交貨所需 17 天 → 緊急
    assert_eq!(class_of("COIL-001"), DecisionClass::Emergency);
    // 庫存 56 覆蓋 30 天需求 54 → 觀察
    assert_eq!(class_of("COAT-001"), DecisionClass::Monitor);
    // 不足但提前期可及 → 標準
    assert_eq!(class_of("CONS-001"), DecisionClass::Standard);

    // 步驟 5: 驗證警報與台帳不變式
    let shortage: Vec<_> = result
        .alerts
        .iter()
        .filter(|a| a.kind == AlertKind::Shortage)
        .collect();
    assert_eq!(shortage.len(), 1);
    assert_eq!(shortage[0].material_id, "COIL-001");
    assert_eq!(shortage[0].severity, AlertSeverity::Critical);

    for id in ["COIL-001", "COAT-001", "CONS-001"] {
        assert!(ledger.open_decision(id).is_some());
    }
    assert!(result.calculation_time_ms.is_some());
}

#[rstest]
#[case(10, DecisionClass::Emergency)]
#[case(40, DecisionClass::Standard)]
#[case(56, DecisionClass::Monitor)]
fn test_stock_level_drives_decision_class(
    #[case] stock: i64,
    #[case] expected: DecisionClass,
) {
    let store = store_with(&[("COIL-001", stock)]);
    let history = steady_history(&["COIL-001"]);
    let mut ledger = DecisionLedger::new();

    single_material_runner()
        .run(&store, &history, &mut ledger, &[], as_of())
        .unwrap();

    assert_eq!(ledger.open_decision("COIL-001").unwrap().class, expected);
}

#[test]
fn test_reruns_and_acknowledge_lifecycle() {
    let runner = single_material_runner();
    let store = store_with(&[("COIL-001", 10)]);
    let history = steady_history(&["COIL-001"]);
    let mut ledger = DecisionLedger::new();

    // 步驟 1: 首次週期開立緊急決策
    let first = runner
        .run(&store, &history, &mut ledger, &[], as_of())
        .unwrap();
    assert_eq!(first.decisions.len(), 1);
    let first_id = ledger.open_decision("COIL-001").unwrap().id;

    // 步驟 2: 相同輸入重跑不重複開立（冪等）
    let second = runner
        .run(&store, &history, &mut ledger, &[], as_of())
        .unwrap();
    assert!(second.decisions.is_empty());
    assert_eq!(ledger.open_decision("COIL-001").unwrap().id, first_id);

    // 步驟 3: 外部確認後，下個週期重新開立
    assert!(ledger.acknowledge("COIL-001"));
    let third = runner
        .run(&store, &history, &mut ledger, &[], as_of())
        .unwrap();
    assert_eq!(third.decisions.len(), 1);
    assert_ne!(ledger.open_decision("COIL-001").unwrap().id, first_id);

    // 確認與被取代的決策保留在稽核檔
    assert!(!ledger.archive().is_empty());
}

#[test]
fn test_missing_history_without_fallback_skips_decision() {
    let store = store_with(&[("COIL-001", 10)]);
    let mut ledger = DecisionLedger::new();

    // 沒有歷史、也沒有配置預設耗用率 → 警告但不產生決策
    let result = single_material_runner()
        .run(&store, &InMemoryHistory::new(), &mut ledger, &[], as_of())
        .unwrap();

    assert!(result.decisions.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert!(ledger.open_decision("COIL-001").is_none());
}

#[test]
fn test_missing_history_with_fallback_yields_low_confidence() {
    let runner = CycleRunner::new(
        EngineConfig::new().with_default_daily_rate(Decimal::from(2)),
        single_material_registry(),
        vec![CustomerSegment::infrastructure()],
    );
    let store = store_with(&[("COIL-001", 10)]);
    let mut ledger = DecisionLedger::new();

    let result = runner
        .run(&store, &InMemoryHistory::new(), &mut ledger, &[], as_of())
        .unwrap();

    // 回退耗用率 2/天：30 天需求 108 遠超庫存 10 → 緊急決策
    assert_eq!(result.decisions.len(), 1);
    assert_eq!(result.decisions[0].class, DecisionClass::Emergency);

    // 回退產生的預測信心為 Low
    assert!(result
        .forecasts
        .iter()
        .all(|f| f.confidence == ForecastConfidence::Low));
}

struct RecordingSink {
    received: Mutex<Vec<String>>,
}

impl EmitSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn deliver(&self, payload: &str) -> Result<(), String> {
        self.received.lock().unwrap().push(payload.to_string());
        Ok(())
    }
}

#[test]
fn test_cycle_output_flows_to_emitter() {
    let store = store_with(&[("COIL-001", 10)]);
    let history = steady_history(&["COIL-001"]);
    let mut ledger = DecisionLedger::new();
    let result = single_material_runner()
        .run(&store, &history, &mut ledger, &[], as_of())
        .unwrap();

    let mut emitter = Emitter::new();
    emitter.register(Box::new(RecordingSink {
        received: Mutex::new(Vec::new()),
    }));
    emitter.enqueue_decisions(&result.decisions).unwrap();
    emitter.enqueue_alerts(&result.alerts).unwrap();

    // 一筆緊急決策 + 一筆短缺警報
    let delivered = emitter.flush();
    assert_eq!(delivered, 2);
    assert_eq!(emitter.pending_len(), 0);
}
