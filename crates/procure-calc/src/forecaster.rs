//! 需求預測器

use chrono::{Duration, NaiveDate};
use procure_core::{
    ConsumptionRecord, CustomerSegment, EngineConfig, Forecast, ForecastConfidence, ProcureError,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::aggregation::HistoryAggregator;
use crate::seasonal::SeasonalCalculator;

/// 需求預測器
///
/// 由回溯視窗的耗用歷史推導基準耗用率，套用季節調整後產生點估計
pub struct DemandForecaster {
    config: EngineConfig,
    segments: Vec<CustomerSegment>,
}

impl DemandForecaster {
    /// 創建預測器
    pub fn new(config: EngineConfig, segments: Vec<CustomerSegment>) -> Self {
        Self { config, segments }
    }

    /// 產生單一物料的需求預測
    ///
    /// 歷史不足時回退到配置的預設耗用率（信心標記為 Low）；
    /// 未配置預設耗用率時直接回報 `InsufficientHistory`
    pub fn forecast(
        &self,
        material_id: &str,
        records: &[ConsumptionRecord],
        horizon_days: u32,
        as_of: NaiveDate,
    ) -> procure_core::Result<Forecast> {
        let window_start = as_of - Duration::days(self.config.trailing_window_days as i64);

        let profile = match HistoryAggregator::material_profile(
            records,
            material_id,
            window_start,
            as_of,
            self.config.period_days,
            self.config.min_history_periods,
        ) {
            Ok(profile) => profile,
            Err(ProcureError::InsufficientHistory(reason)) => {
                // 回退路徑：使用預設耗用率，信心降為 Low
                let default_rate = self
                    .config
                    .default_daily_rate
                    .ok_or(ProcureError::InsufficientHistory(reason))?;
                debug!(material_id, "歷史不足，回退到預設耗用率");

                let multiplier = SeasonalCalculator::blended_multiplier(
                    &self.segments,
                    &Default::default(),
                    as_of,
                    horizon_days,
                )?;
                let quantity = default_rate * Decimal::from(horizon_days) * multiplier;

                return Ok(Forecast::new(
                    material_id.to_string(),
                    horizon_days,
                    as_of,
                    quantity,
                    default_rate,
                    multiplier,
                    ForecastConfidence::Low,
                ));
            }
            Err(e) => return Err(e),
        };

        // 視窗天數非期間長度的整數倍時，開頭的殘缺期間不納入彙總，
        // 分母取期間實際涵蓋的天數而非整個視窗
        let covered_days =
            Decimal::from(profile.period_totals.len() as u64 * self.config.period_days as u64);
        if covered_days <= Decimal::ZERO {
            return Err(ProcureError::CalculationError(format!(
                "物料 {} 的彙總結果不含任何期間",
                material_id
            )));
        }
        let base_rate = profile.window_total / covered_days;
        let confidence = self.classify_confidence(&profile.period_totals)?;

        let weights = profile.segment_weights();
        let multiplier = SeasonalCalculator::blended_multiplier(
            &self.segments,
            &weights,
            as_of,
            horizon_days,
        )?;

        let quantity = base_rate * Decimal::from(horizon_days) * multiplier;
        debug!(
            material_id,
            %base_rate,
            %multiplier,
            ?confidence,
            "需求預測完成"
        );

        Ok(Forecast::new(
            material_id.to_string(),
            horizon_days,
            as_of,
            quantity,
            base_rate,
            multiplier,
            confidence,
        )
        .with_contributing_segments(profile.segment_totals.keys().cloned().collect()))
    }

    /// 依期間波動分類信心水準
    ///
    /// 變異係數低於門檻者為 High，其餘為 Medium（回退路徑另標 Low）
    fn classify_confidence(
        &self,
        period_totals: &[Decimal],
    ) -> procure_core::Result<ForecastConfidence> {
        if period_totals.is_empty() {
            return Ok(ForecastConfidence::Medium);
        }

        let values: Vec<f64> = period_totals
            .iter()
            .map(|d| {
                d.to_f64().ok_or_else(|| {
                    ProcureError::CalculationError(format!("期間總量無法轉換: {}", d))
                })
            })
            .collect::<procure_core::Result<_>>()?;

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        if mean <= 0.0 {
            return Ok(ForecastConfidence::Medium);
        }

        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        let cv = variance.sqrt() / mean;

        let threshold = self.config.cv_high_confidence.to_f64().ok_or_else(|| {
            ProcureError::CalculationError("變異係數門檻無法轉換".to_string())
        })?;

        if cv < threshold {
            Ok(ForecastConfidence::High)
        } else {
            Ok(ForecastConfidence::Medium)
        }
    }
}
