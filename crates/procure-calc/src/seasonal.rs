//! 季節調整計算

use chrono::{Duration, NaiveDate};
use procure_core::{CustomerSegment, ProcureError, Quarter};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// 季節調整計算器
pub struct SeasonalCalculator;

impl SeasonalCalculator {
    /// 計算指定季度的有效乘數
    ///
    /// 多群組時依歷史量佔比加權平均；缺少佔比資料時對已知群組均分
    pub fn weighted_multiplier(
        segments: &[CustomerSegment],
        weights: &BTreeMap<String, Decimal>,
        quarter: Quarter,
    ) -> procure_core::Result<Decimal> {
        if segments.is_empty() {
            return Err(ProcureError::InvalidConfiguration(
                "至少需要一個客戶群組".to_string(),
            ));
        }

        for segment in segments {
            if segment.multiplier(quarter) <= Decimal::ZERO {
                return Err(ProcureError::InvalidConfiguration(format!(
                    "群組 {} 的季節乘數必須為正",
                    segment.segment_id
                )));
            }
        }

        let weight_total: Decimal = segments
            .iter()
            .filter_map(|s| weights.get(&s.segment_id))
            .copied()
            .sum();

        // 缺少權重資料時均分
        if weight_total <= Decimal::ZERO {
            let sum: Decimal = segments.iter().map(|s| s.multiplier(quarter)).sum();
            return Ok(sum / Decimal::from(segments.len() as i64));
        }

        let mut weighted = Decimal::ZERO;
        for segment in segments {
            let weight = weights
                .get(&segment.segment_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            weighted += segment.multiplier(quarter) * weight;
        }

        Ok(weighted / weight_total)
    }

    /// 計算跨時界的混合乘數
    ///
    /// 時界跨越季度邊界時，依各季度涵蓋的天數加權混合
    pub fn blended_multiplier(
        segments: &[CustomerSegment],
        weights: &BTreeMap<String, Decimal>,
        as_of: NaiveDate,
        horizon_days: u32,
    ) -> procure_core::Result<Decimal> {
        if horizon_days == 0 {
            return Err(ProcureError::InvalidConfiguration(
                "預測時界必須大於零".to_string(),
            ));
        }

        // 統計時界內各季度的天數
        let mut quarter_days: BTreeMap<usize, u32> = BTreeMap::new();
        let mut quarters: Vec<Quarter> = Vec::new();
        for offset in 0..horizon_days {
            let date = as_of + Duration::days(offset as i64);
            let quarter = Quarter::from_date(date);
            if !quarters.contains(&quarter) {
                quarters.push(quarter);
            }
            *quarter_days.entry(quarter.index()).or_insert(0) += 1;
        }

        let mut blended = Decimal::ZERO;
        for quarter in quarters {
            let days = quarter_days[&quarter.index()];
            let multiplier = Self::weighted_multiplier(segments, weights, quarter)?;
            blended += multiplier * Decimal::from(days);
        }

        Ok(blended / Decimal::from(horizon_days))
    }
}
