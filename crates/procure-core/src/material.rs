//! 物料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 物料類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialCategory {
    /// 捲料（鋼捲等主原料）
    CoilStock,
    /// 耗材
    Consumable,
    /// 塗層材料
    Coating,
    /// 包裝材料
    Packaging,
}

/// 物料主檔
///
/// 靜態參考資料，引擎只讀；異動由外部管理流程負責
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// 物料ID
    pub material_id: String,

    /// 物料類別
    pub category: MaterialCategory,

    /// 計量單位（如 ton、kg、roll）
    pub unit: String,

    /// 損耗安全係數（訂購量乘數，預設 1.15）
    pub scrap_factor: Decimal,

    /// 單位年持有成本率
    pub holding_cost_rate: Decimal,

    /// 單次訂購成本
    pub ordering_cost: Decimal,
}

impl Material {
    /// 創建新的物料主檔
    pub fn new(material_id: String, category: MaterialCategory, unit: String) -> Self {
        Self {
            material_id,
            category,
            unit,
            scrap_factor: Decimal::new(115, 2), // 1.15
            holding_cost_rate: Decimal::new(25, 2), // 0.25
            ordering_cost: Decimal::from(100),
        }
    }

    /// 建構器模式：設置損耗安全係數
    pub fn with_scrap_factor(mut self, factor: Decimal) -> Self {
        self.scrap_factor = factor;
        self
    }

    /// 建構器模式：設置持有成本率
    pub fn with_holding_cost_rate(mut self, rate: Decimal) -> Self {
        self.holding_cost_rate = rate;
        self
    }

    /// 建構器模式：設置訂購成本
    pub fn with_ordering_cost(mut self, cost: Decimal) -> Self {
        self.ordering_cost = cost;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_material() {
        let material = Material::new(
            "COIL-001".to_string(),
            MaterialCategory::CoilStock,
            "ton".to_string(),
        );

        assert_eq!(material.material_id, "COIL-001");
        assert_eq!(material.category, MaterialCategory::CoilStock);
        // 預設損耗係數 1.15
        assert_eq!(material.scrap_factor, Decimal::new(115, 2));
    }

    #[test]
    fn test_material_builder() {
        let material = Material::new(
            "COAT-001".to_string(),
            MaterialCategory::Coating,
            "kg".to_string(),
        )
        .with_scrap_factor(Decimal::new(105, 2))
        .with_holding_cost_rate(Decimal::new(30, 2))
        .with_ordering_cost(Decimal::from(250));

        assert_eq!(material.scrap_factor, Decimal::new(105, 2));
        assert_eq!(material.holding_cost_rate, Decimal::new(30, 2));
        assert_eq!(material.ordering_cost, Decimal::from(250));
    }
}
