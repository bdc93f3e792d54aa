//! 歷史耗用記錄模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 歷史耗用觀測值
///
/// 僅供預測輸入使用的不可變記錄（append-only）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    /// 物料ID
    pub material_id: String,

    /// 客戶群組ID
    pub segment_id: String,

    /// 耗用數量
    pub quantity: Decimal,

    /// 記錄時間
    pub recorded_at: DateTime<Utc>,
}

impl ConsumptionRecord {
    /// 創建新的耗用記錄
    pub fn new(
        material_id: String,
        segment_id: String,
        quantity: Decimal,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            material_id,
            segment_id,
            quantity,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_record() {
        let record = ConsumptionRecord::new(
            "COIL-001".to_string(),
            "infrastructure".to_string(),
            Decimal::from(12),
            Utc::now(),
        );

        assert_eq!(record.material_id, "COIL-001");
        assert_eq!(record.segment_id, "infrastructure");
        assert_eq!(record.quantity, Decimal::from(12));
    }
}
