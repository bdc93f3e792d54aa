//! 物料與供應商主檔註冊表

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::material::{Material, MaterialCategory};
use crate::supplier::Supplier;
use crate::{ProcureError, Result};

/// 主檔註冊表
///
/// 版本化的唯讀快照，由外部管理流程載入後注入引擎；
/// 以快照注入取代全域狀態，測試時可替換為固定資料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementRegistry {
    /// 資料版本
    pub version: u32,

    materials: HashMap<String, Material>,
    suppliers: HashMap<String, Supplier>,

    /// 每物料的主供應商（至多一個）
    primary: HashMap<String, String>,
}

impl ProcurementRegistry {
    /// 創建空的註冊表
    pub fn new(version: u32) -> Self {
        Self {
            version,
            materials: HashMap::new(),
            suppliers: HashMap::new(),
            primary: HashMap::new(),
        }
    }

    /// 添加物料主檔
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.material_id.clone(), material);
    }

    /// 添加供應商主檔
    pub fn add_supplier(&mut self, supplier: Supplier) {
        self.suppliers.insert(supplier.supplier_id.clone(), supplier);
    }

    /// 指定物料的主供應商（覆蓋先前指定，維持至多一個）
    pub fn set_primary(&mut self, material_id: &str, supplier_id: &str) {
        self.primary
            .insert(material_id.to_string(), supplier_id.to_string());
    }

    /// 讀取物料主檔
    pub fn material(&self, material_id: &str) -> Option<&Material> {
        self.materials.get(material_id)
    }

    /// 讀取供應商主檔
    pub fn supplier(&self, supplier_id: &str) -> Option<&Supplier> {
        self.suppliers.get(supplier_id)
    }

    /// 讀取物料的主供應商
    pub fn primary_supplier(&self, material_id: &str) -> Option<&Supplier> {
        self.primary
            .get(material_id)
            .and_then(|id| self.suppliers.get(id))
    }

    /// 列出可供應指定類別的供應商（依ID排序，確保決策可重現）
    pub fn suppliers_for_category(&self, category: MaterialCategory) -> Vec<&Supplier> {
        let mut result: Vec<&Supplier> = self
            .suppliers
            .values()
            .filter(|s| s.serves(category))
            .collect();
        result.sort_by(|a, b| a.supplier_id.cmp(&b.supplier_id));
        result
    }

    /// 所有物料ID（依ID排序）
    pub fn material_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.materials.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// 驗證主檔
    ///
    /// 主檔損毀（成本非正、評分超界、主供應商懸空）視為整批載入失敗
    pub fn validate(&self) -> Result<()> {
        for material in self.materials.values() {
            if material.holding_cost_rate <= Decimal::ZERO {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "物料 {} 持有成本率必須為正: {}",
                    material.material_id, material.holding_cost_rate
                )));
            }
            if material.ordering_cost <= Decimal::ZERO {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "物料 {} 訂購成本必須為正: {}",
                    material.material_id, material.ordering_cost
                )));
            }
            if material.scrap_factor < Decimal::ONE {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "物料 {} 損耗係數不得低於 1: {}",
                    material.material_id, material.scrap_factor
                )));
            }
        }

        for supplier in self.suppliers.values() {
            if supplier.reliability < Decimal::ZERO || supplier.reliability > Decimal::ONE {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "供應商 {} 可靠度必須落在 [0, 1]: {}",
                    supplier.supplier_id, supplier.reliability
                )));
            }
            if supplier.quality < Decimal::ZERO || supplier.quality > Decimal::from(5) {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "供應商 {} 品質評分必須落在 [0, 5]: {}",
                    supplier.supplier_id, supplier.quality
                )));
            }
            if supplier.unit_price <= Decimal::ZERO {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "供應商 {} 單價必須為正: {}",
                    supplier.supplier_id, supplier.unit_price
                )));
            }
            if supplier.minimum_order_qty < Decimal::ZERO {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "供應商 {} 最小訂購量不得為負: {}",
                    supplier.supplier_id, supplier.minimum_order_qty
                )));
            }
        }

        for (material_id, supplier_id) in &self.primary {
            let material = self.materials.get(material_id).ok_or_else(|| {
                ProcureError::InvalidConfiguration(format!(
                    "主供應商指定了未知物料: {}",
                    material_id
                ))
            })?;
            let supplier = self.suppliers.get(supplier_id).ok_or_else(|| {
                ProcureError::InvalidConfiguration(format!(
                    "物料 {} 的主供應商不存在: {}",
                    material_id, supplier_id
                ))
            })?;
            if !supplier.serves(material.category) {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "主供應商 {} 不供應物料 {} 的類別",
                    supplier_id, material_id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> ProcurementRegistry {
        let mut registry = ProcurementRegistry::new(1);
        registry.add_material(Material::new(
            "COIL-001".to_string(),
            MaterialCategory::CoilStock,
            "ton".to_string(),
        ));
        registry.add_supplier(
            Supplier::new("VENDOR-01".to_string(), 14)
                .with_categories(vec![MaterialCategory::CoilStock])
                .with_unit_price(Decimal::from(500)),
        );
        registry.add_supplier(
            Supplier::new("VENDOR-02".to_string(), 21)
                .with_categories(vec![MaterialCategory::CoilStock, MaterialCategory::Coating])
                .with_unit_price(Decimal::from(480)),
        );
        registry.set_primary("COIL-001", "VENDOR-01");
        registry
    }

    #[test]
    fn test_registry_lookup() {
        let registry = sample_registry();

        assert!(registry.material("COIL-001").is_some());
        assert_eq!(
            registry.primary_supplier("COIL-001").unwrap().supplier_id,
            "VENDOR-01"
        );

        let candidates = registry.suppliers_for_category(MaterialCategory::CoilStock);
        assert_eq!(candidates.len(), 2);
        // 依ID排序，保證列舉順序可重現
        assert_eq!(candidates[0].supplier_id, "VENDOR-01");
        assert_eq!(candidates[1].supplier_id, "VENDOR-02");
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample_registry().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nonpositive_holding_cost() {
        let mut registry = sample_registry();
        registry.add_material(
            Material::new(
                "BAD-001".to_string(),
                MaterialCategory::Consumable,
                "pcs".to_string(),
            )
            .with_holding_cost_rate(Decimal::ZERO),
        );

        assert!(matches!(
            registry.validate(),
            Err(ProcureError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_dangling_primary() {
        let mut registry = sample_registry();
        registry.set_primary("COIL-001", "VENDOR-99");

        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_primary_is_replaced_not_duplicated() {
        let mut registry = sample_registry();
        registry.set_primary("COIL-001", "VENDOR-02");

        // 重新指定後仍然只有一個主供應商
        assert_eq!(
            registry.primary_supplier("COIL-001").unwrap().supplier_id,
            "VENDOR-02"
        );
    }
}
