//! 示範執行器：以內建範例資料跑一個完整決策週期

use anyhow::Result;
use chrono::{Duration, Utc};
use procure::prelude::*;
use rust_decimal::Decimal;
use tracing::info;

fn main() -> Result<()> {
    procure::telemetry::init();

    let registry = sample_registry();
    let inventory = sample_inventory();
    let history = sample_history();
    let mut ledger = DecisionLedger::new();

    let runner = CycleRunner::new(
        EngineConfig::new().with_default_daily_rate(Decimal::ONE),
        registry,
        vec![
            CustomerSegment::infrastructure(),
            CustomerSegment::oil_gas(),
            CustomerSegment::contractors(),
        ],
    );

    let as_of = Utc::now().date_naive();
    let result = runner.run(&inventory, &history, &mut ledger, &[], as_of)?;

    info!(
        decisions = result.decisions.len(),
        alerts = result.alerts.len(),
        elapsed_ms = ?result.calculation_time_ms,
        "週期執行完畢"
    );

    // 決策與警報發佈到日誌目的地
    let mut emitter = Emitter::new();
    emitter.register(Box::new(LogSink::new()));
    emitter.enqueue_decisions(&result.decisions)?;
    emitter.enqueue_alerts(&result.alerts)?;
    emitter.flush();

    for decision in &result.decisions {
        println!("{}", serde_json::to_string_pretty(decision)?);
    }

    Ok(())
}

fn sample_registry() -> ProcurementRegistry {
    let mut registry = ProcurementRegistry::new(1);

    registry.add_material(Material::new(
        "COIL-HDG-120".to_string(),
        MaterialCategory::CoilStock,
        "ton".to_string(),
    ));
    registry.add_material(
        Material::new(
            "COAT-ZN-05".to_string(),
            MaterialCategory::Coating,
            "kg".to_string(),
        )
        .with_scrap_factor(Decimal::new(105, 2)),
    );

    registry.add_supplier(
        Supplier::new("VENDOR-STEEL-A".to_string(), 14)
            .with_categories(vec![MaterialCategory::CoilStock])
            .with_reliability(Decimal::new(92, 2))
            .with_unit_price(Decimal::from(540))
            .with_minimum_order_qty(Decimal::from(25)),
    );
    registry.add_supplier(
        Supplier::new("VENDOR-STEEL-B".to_string(), 7)
            .with_categories(vec![MaterialCategory::CoilStock])
            .with_reliability(Decimal::new(85, 2))
            .with_unit_price(Decimal::from(565)),
    );
    registry.add_supplier(
        Supplier::new("VENDOR-CHEM-A".to_string(), 21)
            .with_categories(vec![MaterialCategory::Coating])
            .with_reliability(Decimal::new(88, 2))
            .with_unit_price(Decimal::from(12)),
    );

    registry.set_primary("COIL-HDG-120", "VENDOR-STEEL-A");
    registry.set_primary("COAT-ZN-05", "VENDOR-CHEM-A");
    registry
}

fn sample_inventory() -> InventoryStore {
    let mut store = InventoryStore::new();
    store.upsert(InventoryRecord::new(
        "COIL-HDG-120".to_string(),
        Decimal::from(80),
    ));
    store.upsert(InventoryRecord::new(
        "COAT-ZN-05".to_string(),
        Decimal::from(400),
    ));
    store
}

fn sample_history() -> InMemoryHistory {
    let mut history = InMemoryHistory::new();
    let now = Utc::now();

    // 過去 90 天每 10 天一筆耗用
    for i in 1..=9 {
        let at = now - Duration::days(i * 10);
        history.push(ConsumptionRecord::new(
            "COIL-HDG-120".to_string(),
            "infrastructure".to_string(),
            Decimal::from(30),
            at,
        ));
        history.push(ConsumptionRecord::new(
            "COAT-ZN-05".to_string(),
            "contractors".to_string(),
            Decimal::from(90),
            at,
        ));
    }
    history
}
