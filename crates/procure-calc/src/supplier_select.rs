//! 供應商選擇

use procure_core::{
    EngineConfig, Material, ProcureError, ProcurementRegistry, Supplier,
};
use rust_decimal::Decimal;
use tracing::debug;

/// 採購緊急度
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcurementUrgency {
    /// 標準採購（附剩餘覆蓋天數，作為提前期上限）
    Standard { remaining_days: Decimal },
    /// 緊急採購
    Emergency,
}

/// 供應商選擇器
pub struct SupplierSelector;

impl SupplierSelector {
    /// 為指定物料選擇供應商
    ///
    /// 主供應商可靠度高於門檻時直接選用；否則評估次要供應商：
    /// 標準採購取提前期可及者中可靠度最高者，緊急採購取提前期最短者。
    /// 平手時比單價（低者優先），再比供應商ID（字典序）
    pub fn select<'a>(
        registry: &'a ProcurementRegistry,
        material: &Material,
        urgency: ProcurementUrgency,
        config: &EngineConfig,
    ) -> procure_core::Result<&'a Supplier> {
        let primary = registry.primary_supplier(&material.material_id);

        if let Some(primary) = primary {
            if primary.reliability > config.reliability_auto_select {
                debug!(
                    material_id = %material.material_id,
                    supplier_id = %primary.supplier_id,
                    "主供應商可靠度達標，直接選用"
                );
                return Ok(primary);
            }
        }

        // 主供應商不可靠（或未指定）時評估次要供應商
        let primary_id = primary.map(|s| s.supplier_id.as_str());
        let candidates: Vec<&Supplier> = registry
            .suppliers_for_category(material.category)
            .into_iter()
            .filter(|s| Some(s.supplier_id.as_str()) != primary_id)
            .collect();

        let selected = match urgency {
            ProcurementUrgency::Standard { remaining_days } => {
                // 提前期必須在剩餘覆蓋天數內，可靠度最高者勝出
                let mut eligible: Vec<&Supplier> = candidates
                    .into_iter()
                    .filter(|s| Decimal::from(s.lead_time_days) <= remaining_days)
                    .collect();
                eligible.sort_by(|a, b| {
                    b.reliability
                        .cmp(&a.reliability)
                        .then(a.unit_price.cmp(&b.unit_price))
                        .then(a.supplier_id.cmp(&b.supplier_id))
                });
                eligible.into_iter().next()
            }
            ProcurementUrgency::Emergency => {
                // 緊急採購以提前期最短為先
                let mut eligible = candidates;
                eligible.sort_by(|a, b| {
                    a.lead_time_days
                        .cmp(&b.lead_time_days)
                        .then(a.unit_price.cmp(&b.unit_price))
                        .then(a.supplier_id.cmp(&b.supplier_id))
                });
                eligible.into_iter().next()
            }
        };

        selected.ok_or_else(|| {
            ProcureError::NoEligibleSupplier(format!(
                "物料 {} 在 {:?} 模式下無合格供應商",
                material.material_id, urgency
            ))
        })
    }
}
