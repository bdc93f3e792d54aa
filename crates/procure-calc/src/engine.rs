//! 採購決策引擎
//!
//! 對單一物料執行固定順序的決策樹：
//! 充足性檢查 → 緊急度判定 → 供應商選擇 → 訂購量計算 → 警報推導

use chrono::NaiveDate;
use procure_core::{
    Alert, AlertKind, AlertSeverity, ConsumptionRecord, CustomerSegment, DecisionClass,
    EngineConfig, ExpiringLot, Forecast, InventoryRecord, Material, ProcureError,
    ProcurementDecision, ProcurementRegistry,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::forecaster::DemandForecaster;
use crate::order_sizing::OrderSizingCalculator;
use crate::supplier_select::{ProcurementUrgency, SupplierSelector};

/// 單一物料的決策結果
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    /// 採購決策
    pub decision: ProcurementDecision,
    /// 推導警報（每物料至多一筆庫存警報，劣化警報另計）
    pub alerts: Vec<Alert>,
    /// 過程中產生的預測
    pub forecasts: Vec<Forecast>,
}

/// 採購決策引擎
pub struct DecisionEngine {
    config: EngineConfig,
    forecaster: DemandForecaster,
}

impl DecisionEngine {
    /// 創建決策引擎
    pub fn new(config: EngineConfig, segments: Vec<CustomerSegment>) -> Self {
        let forecaster = DemandForecaster::new(config.clone(), segments);
        Self { config, forecaster }
    }

    /// 對單一物料執行決策樹
    pub fn evaluate_material(
        &self,
        registry: &ProcurementRegistry,
        material_id: &str,
        inventory: &HashMap<String, InventoryRecord>,
        records: &[ConsumptionRecord],
        expiring_lots: &[ExpiringLot],
        as_of: NaiveDate,
    ) -> procure_core::Result<DecisionOutcome> {
        let material = registry.material(material_id).ok_or_else(|| {
            ProcureError::InvalidConfiguration(format!("未知物料: {}", material_id))
        })?;
        let record = inventory
            .get(material_id)
            .ok_or_else(|| ProcureError::MissingInventoryState(material_id.to_string()))?;

        let mut forecasts = Vec::new();
        let mut alerts = Vec::new();

        // 步驟 1: 需求預測（充足性檢查時界）
        info!(material_id, "步驟 1: 計算需求預測");
        let forecast = self.forecaster.forecast(
            material_id,
            records,
            self.config.sufficiency_horizon_days,
            as_of,
        )?;
        let base_rate = forecast.base_rate;
        let horizon_demand = forecast.quantity;
        forecasts.push(forecast);

        // 步驟 2: 充足性檢查
        info!(material_id, %horizon_demand, stock = %record.current_stock, "步驟 2: 充足性檢查");
        if record.current_stock >= horizon_demand {
            let decision =
                self.monitor_decision(material, record, horizon_demand, base_rate, expiring_lots, as_of, &mut alerts);
            // 劣化檢查不依賴補貨分支，庫存充足時照常執行
            self.check_supplier_degradation(registry, material, &mut alerts);
            return Ok(DecisionOutcome {
                decision,
                alerts,
                forecasts,
            });
        }

        // 步驟 3: 緊急度判定
        // 剩餘覆蓋天數以未調整的基準耗用率估算，耗用率過低時以配置下限代入
        let effective_rate = base_rate.max(self.config.consumption_epsilon);
        let remaining_days = record.current_stock / effective_rate;
        let reference_lead = self.reference_lead_time(registry, material)?;
        let required_days =
            Decimal::from(reference_lead + self.config.standard_delivery_buffer_days);

        let urgency = if required_days > remaining_days {
            ProcurementUrgency::Emergency
        } else {
            ProcurementUrgency::Standard { remaining_days }
        };
        info!(material_id, %remaining_days, %required_days, ?urgency, "步驟 3: 緊急度判定");

        // 步驟 4: 供應商選擇
        let supplier = SupplierSelector::select(registry, material, urgency, &self.config)?;
        info!(material_id, supplier_id = %supplier.supplier_id, "步驟 4: 供應商選定");

        // 步驟 5: 訂購量計算
        let mut decision = match urgency {
            ProcurementUrgency::Standard { .. } => {
                let quantity =
                    OrderSizingCalculator::standard_order_quantity(material, supplier, base_rate)?;
                let mut decision =
                    ProcurementDecision::new(material_id.to_string(), DecisionClass::Standard)
                        .with_supplier(supplier.supplier_id.clone())
                        .with_order_quantity(quantity);
                decision.push_justification(format!(
                    "庫存 {} 低於 {} 天需求 {}，提前期可及，依 EOQ 補貨",
                    record.current_stock, self.config.sufficiency_horizon_days, horizon_demand
                ));
                decision
            }
            ProcurementUrgency::Emergency => {
                // 緊急補貨須覆蓋選定供應商交貨期間的需求
                let cover_days = supplier.lead_time_days + self.config.standard_delivery_buffer_days;
                let lead_forecast =
                    self.forecaster
                        .forecast(material_id, records, cover_days, as_of)?;
                let quantity = OrderSizingCalculator::emergency_order_quantity(
                    lead_forecast.quantity,
                    record.current_stock,
                    supplier.minimum_order_qty,
                );
                forecasts.push(lead_forecast);

                alerts.push(Alert::new(
                    material_id.to_string(),
                    AlertKind::Shortage,
                    AlertSeverity::Critical,
                    remaining_days,
                    required_days,
                    format!(
                        "剩餘覆蓋 {} 天，低於交貨所需 {} 天",
                        remaining_days.round_dp(1),
                        required_days
                    ),
                ));

                let mut decision =
                    ProcurementDecision::new(material_id.to_string(), DecisionClass::Emergency)
                        .with_supplier(supplier.supplier_id.clone())
                        .with_order_quantity(quantity)
                        .with_expedite_premium(true);
                decision.push_justification(format!(
                    "剩餘覆蓋 {} 天低於交貨所需 {} 天，繞過 EOQ 緊急補貨",
                    remaining_days.round_dp(1),
                    required_days
                ));
                decision
            }
        };
        decision.push_justification(format!("選定供應商 {}", supplier.supplier_id));

        // 步驟 6: 供應商劣化檢查
        self.check_supplier_degradation(registry, material, &mut alerts);

        debug!(
            material_id,
            class = ?decision.class,
            quantity = %decision.order_quantity,
            "決策完成"
        );

        Ok(DecisionOutcome {
            decision,
            alerts,
            forecasts,
        })
    }

    /// 充足時的觀察決策（附帶到期批次與庫存過高檢查）
    #[allow(clippy::too_many_arguments)]
    fn monitor_decision(
        &self,
        material: &Material,
        record: &InventoryRecord,
        horizon_demand: Decimal,
        base_rate: Decimal,
        expiring_lots: &[ExpiringLot],
        as_of: NaiveDate,
        alerts: &mut Vec<Alert>,
    ) -> ProcurementDecision {
        let mut decision =
            ProcurementDecision::new(material.material_id.clone(), DecisionClass::Monitor);
        decision.push_justification(format!(
            "庫存 {} 覆蓋 {} 天需求 {}",
            record.current_stock, self.config.sufficiency_horizon_days, horizon_demand
        ));

        // 前瞻視窗內到期的批次視同不可用庫存
        let lookahead_end =
            as_of + chrono::Duration::days(self.config.expiration_lookahead_days as i64);
        let expiring_qty: Decimal = expiring_lots
            .iter()
            .filter(|lot| lot.material_id == material.material_id && lot.expires_on < lookahead_end)
            .map(|lot| lot.quantity)
            .sum();
        let effective_stock = record.current_stock - expiring_qty;

        if expiring_qty > Decimal::ZERO && effective_stock < horizon_demand {
            alerts.push(Alert::new(
                material.material_id.clone(),
                AlertKind::Shortage,
                AlertSeverity::Medium,
                effective_stock,
                horizon_demand,
                format!(
                    "{} 天內有 {} 批次到期，有效庫存 {} 低於需求",
                    self.config.expiration_lookahead_days, expiring_qty, effective_stock
                ),
            ));
            return decision;
        }

        // 庫存過高：現有庫存超過目標週轉對應的水位
        let annual_demand = base_rate * Decimal::from(365);
        let turnover_cap = annual_demand / self.config.target_turnover_per_year;
        if annual_demand > Decimal::ZERO && record.current_stock > turnover_cap {
            alerts.push(Alert::new(
                material.material_id.clone(),
                AlertKind::Overstock,
                AlertSeverity::Low,
                record.current_stock,
                turnover_cap,
                format!(
                    "庫存 {} 超過目標週轉水位 {}",
                    record.current_stock,
                    turnover_cap.round_dp(1)
                ),
            ));
        }

        decision
    }

    /// 緊急度判定用的參考提前期（主供應商優先，否則取同類別最短者）
    fn reference_lead_time(
        &self,
        registry: &ProcurementRegistry,
        material: &Material,
    ) -> procure_core::Result<u32> {
        if let Some(primary) = registry.primary_supplier(&material.material_id) {
            return Ok(primary.lead_time_days);
        }
        registry
            .suppliers_for_category(material.category)
            .iter()
            .map(|s| s.lead_time_days)
            .min()
            .ok_or_else(|| {
                ProcureError::NoEligibleSupplier(format!(
                    "物料 {} 沒有任何供應商",
                    material.material_id
                ))
            })
    }

    /// 主供應商可靠度低於改善門檻時推導劣化警報
    fn check_supplier_degradation(
        &self,
        registry: &ProcurementRegistry,
        material: &Material,
        alerts: &mut Vec<Alert>,
    ) {
        if let Some(primary) = registry.primary_supplier(&material.material_id) {
            if primary.reliability < self.config.reliability_improvement_floor {
                alerts.push(Alert::new(
                    material.material_id.clone(),
                    AlertKind::SupplierDegradation,
                    AlertSeverity::Medium,
                    primary.reliability,
                    self.config.reliability_improvement_floor,
                    format!(
                        "主供應商 {} 可靠度 {} 低於改善門檻",
                        primary.supplier_id, primary.reliability
                    ),
                ));
            }
        }
    }
}
