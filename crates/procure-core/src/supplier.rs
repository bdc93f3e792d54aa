//! 供應商模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::material::MaterialCategory;

/// 供應商主檔
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// 供應商ID
    pub supplier_id: String,

    /// 可供應的物料類別
    pub categories: Vec<MaterialCategory>,

    /// 交貨提前期（天）
    pub lead_time_days: u32,

    /// 可靠度評分（0.0 - 1.0）
    pub reliability: Decimal,

    /// 品質評分（0.0 - 5.0）
    pub quality: Decimal,

    /// 單位價格
    pub unit_price: Decimal,

    /// 最小訂購量
    pub minimum_order_qty: Decimal,

    /// 地理運費係數
    pub shipping_cost_factor: Decimal,
}

impl Supplier {
    /// 創建新的供應商主檔
    pub fn new(supplier_id: String, lead_time_days: u32) -> Self {
        Self {
            supplier_id,
            categories: Vec::new(),
            lead_time_days,
            reliability: Decimal::new(9, 1),  // 0.9
            quality: Decimal::new(40, 1),     // 4.0
            unit_price: Decimal::ONE,
            minimum_order_qty: Decimal::ZERO,
            shipping_cost_factor: Decimal::ONE,
        }
    }

    /// 建構器模式：設置可供應類別
    pub fn with_categories(mut self, categories: Vec<MaterialCategory>) -> Self {
        self.categories = categories;
        self
    }

    /// 建構器模式：設置可靠度
    pub fn with_reliability(mut self, reliability: Decimal) -> Self {
        self.reliability = reliability;
        self
    }

    /// 建構器模式：設置品質評分
    pub fn with_quality(mut self, quality: Decimal) -> Self {
        self.quality = quality;
        self
    }

    /// 建構器模式：設置單位價格
    pub fn with_unit_price(mut self, price: Decimal) -> Self {
        self.unit_price = price;
        self
    }

    /// 建構器模式：設置最小訂購量
    pub fn with_minimum_order_qty(mut self, qty: Decimal) -> Self {
        self.minimum_order_qty = qty;
        self
    }

    /// 建構器模式：設置運費係數
    pub fn with_shipping_cost_factor(mut self, factor: Decimal) -> Self {
        self.shipping_cost_factor = factor;
        self
    }

    /// 檢查是否可供應指定類別
    pub fn serves(&self, category: MaterialCategory) -> bool {
        self.categories.contains(&category)
    }
}
