//! 歷史耗用彙總

use chrono::NaiveDate;
use procure_core::{ConsumptionRecord, ProcureError};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// 單一（物料, 群組, 期間）的彙總耗用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodConsumption {
    /// 物料ID
    pub material_id: String,
    /// 群組ID
    pub segment_id: String,
    /// 期間起日（含）
    pub period_start: NaiveDate,
    /// 期間迄日（不含）
    pub period_end: NaiveDate,
    /// 期間總耗用（缺漏期間記為零，不視為缺失）
    pub total: Decimal,
}

/// 單一物料的彙總歷史輪廓
#[derive(Debug, Clone)]
pub struct MaterialHistory {
    /// 物料ID
    pub material_id: String,
    /// 各期間總耗用（跨群組合計，時間由遠至近）
    pub period_totals: Vec<Decimal>,
    /// 視窗內總耗用
    pub window_total: Decimal,
    /// 各群組總耗用（量佔比權重來源；BTreeMap 保證順序可重現）
    pub segment_totals: BTreeMap<String, Decimal>,
    /// 觀測跨度涵蓋的完整期間數
    pub complete_periods: u32,
}

impl MaterialHistory {
    /// 各群組的量佔比權重
    pub fn segment_weights(&self) -> BTreeMap<String, Decimal> {
        let total: Decimal = self.segment_totals.values().copied().sum();
        if total <= Decimal::ZERO {
            return BTreeMap::new();
        }
        self.segment_totals
            .iter()
            .map(|(id, qty)| (id.clone(), qty / total))
            .collect()
    }
}

/// 歷史彙總計算器
pub struct HistoryAggregator;

impl HistoryAggregator {
    /// 彙總視窗內的耗用記錄為（物料, 群組, 期間）總量
    ///
    /// 期間由視窗迄日向前切齊；相同輸入重複彙總產生相同輸出（冪等）
    pub fn aggregate(
        records: &[ConsumptionRecord],
        window_start: NaiveDate,
        window_end: NaiveDate,
        period_days: u32,
    ) -> procure_core::Result<Vec<PeriodConsumption>> {
        if period_days == 0 {
            return Err(ProcureError::InvalidConfiguration(
                "期間長度必須大於零".to_string(),
            ));
        }
        if window_end <= window_start {
            return Err(ProcureError::InvalidConfiguration(format!(
                "視窗無效: {} 至 {}",
                window_start, window_end
            )));
        }

        let periods = Self::period_bounds(window_start, window_end, period_days);

        // 收集視窗內出現過的（物料, 群組）組合
        let mut keys: Vec<(String, String)> = Vec::new();
        for record in records {
            let date = record.recorded_at.date_naive();
            if date < window_start || date >= window_end {
                continue;
            }
            let key = (record.material_id.clone(), record.segment_id.clone());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys.sort();

        // 逐組合、逐期間加總；沒有記錄的期間補零
        let mut results = Vec::new();
        for (material_id, segment_id) in &keys {
            for &(period_start, period_end) in &periods {
                let total: Decimal = records
                    .iter()
                    .filter(|r| {
                        let date = r.recorded_at.date_naive();
                        r.material_id == *material_id
                            && r.segment_id == *segment_id
                            && date >= period_start
                            && date < period_end
                    })
                    .map(|r| r.quantity)
                    .sum();

                results.push(PeriodConsumption {
                    material_id: material_id.clone(),
                    segment_id: segment_id.clone(),
                    period_start,
                    period_end,
                    total,
                });
            }
        }

        Ok(results)
    }

    /// 彙總單一物料的歷史輪廓
    ///
    /// 完整期間數低於 `min_periods` 時回報 `InsufficientHistory`，
    /// 呼叫端應回退到配置的預設耗用率
    pub fn material_profile(
        records: &[ConsumptionRecord],
        material_id: &str,
        window_start: NaiveDate,
        window_end: NaiveDate,
        period_days: u32,
        min_periods: u32,
    ) -> procure_core::Result<MaterialHistory> {
        let aggregated = Self::aggregate(records, window_start, window_end, period_days)?;

        let material_rows: Vec<&PeriodConsumption> = aggregated
            .iter()
            .filter(|p| p.material_id == material_id)
            .collect();

        let complete_periods =
            Self::complete_periods(records, material_id, window_start, window_end, period_days);
        if complete_periods < min_periods {
            return Err(ProcureError::InsufficientHistory(format!(
                "物料 {} 僅涵蓋 {} 個完整期間（需要 {}）",
                material_id, complete_periods, min_periods
            )));
        }

        // 跨群組合計各期間總量
        let mut by_period: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        let mut segment_totals: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut window_total = Decimal::ZERO;

        for row in &material_rows {
            *by_period.entry(row.period_start).or_insert(Decimal::ZERO) += row.total;
            *segment_totals
                .entry(row.segment_id.clone())
                .or_insert(Decimal::ZERO) += row.total;
            window_total += row.total;
        }

        Ok(MaterialHistory {
            material_id: material_id.to_string(),
            period_totals: by_period.into_values().collect(),
            window_total,
            segment_totals,
            complete_periods,
        })
    }

    /// 期間切分（由視窗迄日向前切齊，起日不足一期者捨去）
    fn period_bounds(
        window_start: NaiveDate,
        window_end: NaiveDate,
        period_days: u32,
    ) -> Vec<(NaiveDate, NaiveDate)> {
        let mut periods = Vec::new();
        let mut end = window_end;

        loop {
            let start = end - chrono::Duration::days(period_days as i64);
            if start < window_start {
                break;
            }
            periods.push((start, end));
            end = start;
        }

        periods.reverse();
        periods
    }

    /// 觀測跨度涵蓋的完整期間數
    ///
    /// 以該物料在視窗內最早一筆觀測到視窗迄日的跨度計算；
    /// 視窗內完全沒有觀測記為零（視窗外的舊記錄不計）
    fn complete_periods(
        records: &[ConsumptionRecord],
        material_id: &str,
        window_start: NaiveDate,
        window_end: NaiveDate,
        period_days: u32,
    ) -> u32 {
        let first = records
            .iter()
            .filter(|r| r.material_id == material_id)
            .map(|r| r.recorded_at.date_naive())
            .filter(|d| *d >= window_start && *d < window_end)
            .min();

        match first {
            Some(first_date) => {
                let span_days = (window_end - first_date).num_days();
                (span_days / period_days as i64) as u32
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(material: &str, segment: &str, qty: i64, y: i32, m: u32, d: u32) -> ConsumptionRecord {
        ConsumptionRecord::new(
            material.to_string(),
            segment.to_string(),
            Decimal::from(qty),
            Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        )
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 30).unwrap(),
        )
    }

    #[test]
    fn test_aggregate_with_gap_fill() {
        let (start, end) = window();
        let records = vec![
            record("COIL-001", "infrastructure", 30, 2025, 5, 10),
            record("COIL-001", "infrastructure", 20, 2025, 5, 20),
            // 中間期間無記錄（缺漏應補零）
            record("COIL-001", "infrastructure", 40, 2025, 7, 10),
        ];

        let result = HistoryAggregator::aggregate(&records, start, end, 30).unwrap();

        // 90 天視窗切成 3 期
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].total, Decimal::from(50));
        assert_eq!(result[1].total, Decimal::ZERO); // 缺漏期間為零耗用
        assert_eq!(result[2].total, Decimal::from(40));
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let (start, end) = window();
        let records = vec![
            record("COIL-001", "infrastructure", 30, 2025, 5, 10),
            record("COIL-001", "oil-gas", 15, 2025, 6, 10),
            record("COAT-001", "contractors", 5, 2025, 7, 1),
        ];

        let first = HistoryAggregator::aggregate(&records, start, end, 30).unwrap();
        let second = HistoryAggregator::aggregate(&records, start, end, 30).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_records_outside_window_ignored() {
        let (start, end) = window();
        let records = vec![
            record("COIL-001", "infrastructure", 30, 2025, 5, 10),
            record("COIL-001", "infrastructure", 999, 2024, 1, 1), // 視窗外
        ];

        let result = HistoryAggregator::aggregate(&records, start, end, 30).unwrap();
        let total: Decimal = result.iter().map(|p| p.total).sum();
        assert_eq!(total, Decimal::from(30));
    }

    #[test]
    fn test_material_profile() {
        let (start, end) = window();
        let records = vec![
            record("COIL-001", "infrastructure", 60, 2025, 5, 10),
            record("COIL-001", "oil-gas", 30, 2025, 6, 10),
            record("COIL-001", "infrastructure", 30, 2025, 7, 10),
        ];

        let profile = HistoryAggregator::material_profile(
            &records, "COIL-001", start, end, 30, 2,
        )
        .unwrap();

        assert_eq!(profile.window_total, Decimal::from(120));
        assert_eq!(profile.period_totals.len(), 3);
        assert_eq!(
            profile.segment_totals.get("infrastructure"),
            Some(&Decimal::from(90))
        );

        // 量佔比權重：infrastructure 0.75、oil-gas 0.25
        let weights = profile.segment_weights();
        assert_eq!(
            weights.get("infrastructure"),
            Some(&Decimal::new(75, 2))
        );
        assert_eq!(weights.get("oil-gas"), Some(&Decimal::new(25, 2)));
    }

    #[test]
    fn test_insufficient_history() {
        let (start, end) = window();
        // 最早觀測距視窗迄日僅 20 天，不足 2 個完整期間
        let records = vec![record("COIL-002", "infrastructure", 10, 2025, 7, 10)];

        let err = HistoryAggregator::material_profile(
            &records, "COIL-002", start, end, 30, 2,
        )
        .unwrap_err();

        assert!(matches!(err, ProcureError::InsufficientHistory(_)));
    }

    #[test]
    fn test_stale_records_outside_window_are_insufficient() {
        let (start, end) = window();
        // 記錄全部早於視窗起日：舊觀測不得充當視窗內的完整期間
        let records = vec![
            record("COIL-004", "infrastructure", 30, 2024, 1, 10),
            record("COIL-004", "infrastructure", 30, 2024, 2, 10),
            record("COIL-004", "infrastructure", 30, 2024, 3, 10),
        ];

        let err = HistoryAggregator::material_profile(
            &records, "COIL-004", start, end, 30, 2,
        )
        .unwrap_err();

        assert!(matches!(err, ProcureError::InsufficientHistory(_)));
    }

    #[test]
    fn test_no_history_is_insufficient() {
        let (start, end) = window();

        let err =
            HistoryAggregator::material_profile(&[], "COIL-003", start, end, 30, 2).unwrap_err();
        assert!(matches!(err, ProcureError::InsufficientHistory(_)));
    }
}
