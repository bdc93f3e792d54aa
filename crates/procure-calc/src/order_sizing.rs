//! 訂購量計算（EOQ 與緊急補貨量）

use procure_core::{Material, ProcureError, Supplier};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

const DAYS_PER_YEAR: i64 = 365;

/// 訂購量計算器
pub struct OrderSizingCalculator;

impl OrderSizingCalculator {
    /// 經濟訂購量 EOQ = sqrt(2 × 年需求 × 訂購成本 / 單位年持有成本)
    pub fn economic_order_quantity(
        annual_demand: Decimal,
        ordering_cost: Decimal,
        holding_cost_per_unit: Decimal,
    ) -> procure_core::Result<Decimal> {
        if annual_demand < Decimal::ZERO {
            return Err(ProcureError::CalculationError(format!(
                "年需求不得為負: {}",
                annual_demand
            )));
        }
        if ordering_cost <= Decimal::ZERO || holding_cost_per_unit <= Decimal::ZERO {
            return Err(ProcureError::CalculationError(format!(
                "成本參數必須為正: 訂購 {} / 持有 {}",
                ordering_cost, holding_cost_per_unit
            )));
        }

        let inner = Decimal::TWO * annual_demand * ordering_cost / holding_cost_per_unit;
        Ok(decimal_sqrt(inner)?.round_dp(2))
    }

    /// 標準補貨量：EOQ 與供應商最小訂購量取大者
    ///
    /// 年需求以基準耗用率年化並乘上損耗安全係數
    pub fn standard_order_quantity(
        material: &Material,
        supplier: &Supplier,
        base_rate: Decimal,
    ) -> procure_core::Result<Decimal> {
        let annual_demand = base_rate * Decimal::from(DAYS_PER_YEAR) * material.scrap_factor;
        let holding_cost_per_unit = material.holding_cost_rate * supplier.unit_price;

        let eoq = Self::economic_order_quantity(
            annual_demand,
            material.ordering_cost,
            holding_cost_per_unit,
        )?;

        Ok(eoq.max(supplier.minimum_order_qty))
    }

    /// 緊急補貨量：交貨期間預測需求扣除現有庫存，不低於最小訂購量
    pub fn emergency_order_quantity(
        forecast_over_lead: Decimal,
        current_stock: Decimal,
        minimum_order_qty: Decimal,
    ) -> Decimal {
        let shortfall = (forecast_over_lead - current_stock).max(Decimal::ZERO);
        shortfall.max(minimum_order_qty)
    }
}

/// Decimal 平方根（經由 f64 往返）
pub(crate) fn decimal_sqrt(value: Decimal) -> procure_core::Result<Decimal> {
    if value < Decimal::ZERO {
        return Err(ProcureError::CalculationError(format!(
            "負數無法開根號: {}",
            value
        )));
    }
    let f = value
        .to_f64()
        .ok_or_else(|| ProcureError::CalculationError(format!("數值無法轉換: {}", value)))?;
    Decimal::from_f64(f.sqrt())
        .ok_or_else(|| ProcureError::CalculationError(format!("開根號結果無法表示: {}", f)))
}
