//! 警報模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 警報類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// 短缺風險
    Shortage,
    /// 庫存過高（週轉率過低）
    Overstock,
    /// 供應商劣化（可靠度低於改善門檻）
    SupplierDegradation,
}

/// 警報嚴重度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// 警報記錄
///
/// 由決策引擎推導產生，非權威資料，可安全重新產生
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// 警報ID
    pub id: Uuid,

    /// 物料ID
    pub material_id: String,

    /// 警報類型
    pub kind: AlertKind,

    /// 嚴重度
    pub severity: AlertSeverity,

    /// 觸發時的觀測值
    pub observed_value: Decimal,

    /// 觸發門檻
    pub threshold_value: Decimal,

    /// 說明
    pub message: String,

    /// 觸發時間
    pub triggered_at: DateTime<Utc>,
}

impl Alert {
    /// 創建新的警報
    pub fn new(
        material_id: String,
        kind: AlertKind,
        severity: AlertSeverity,
        observed_value: Decimal,
        threshold_value: Decimal,
        message: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            material_id,
            kind,
            severity,
            observed_value,
            threshold_value,
            message,
            triggered_at: Utc::now(),
        }
    }
}
