//! 庫存狀態模型

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ProcureError, Result};

/// 庫存記錄（每物料一筆）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// 物料ID
    pub material_id: String,

    /// 現有庫存（不得為負）
    pub current_stock: Decimal,

    /// 平均日耗用率（推導值）
    pub daily_consumption_rate: Decimal,

    /// 再訂購點
    pub reorder_point: Decimal,

    /// 安全庫存
    pub safety_stock: Decimal,

    /// 最後更新時間
    pub last_updated: DateTime<Utc>,
}

impl InventoryRecord {
    /// 創建新的庫存記錄
    pub fn new(material_id: String, current_stock: Decimal) -> Self {
        Self {
            material_id,
            current_stock,
            daily_consumption_rate: Decimal::ZERO,
            reorder_point: Decimal::ZERO,
            safety_stock: Decimal::ZERO,
            last_updated: Utc::now(),
        }
    }

    /// 建構器模式：設置日耗用率
    pub fn with_daily_consumption_rate(mut self, rate: Decimal) -> Self {
        self.daily_consumption_rate = rate;
        self
    }

    /// 建構器模式：設置再訂購點
    pub fn with_reorder_point(mut self, point: Decimal) -> Self {
        self.reorder_point = point;
        self
    }

    /// 建構器模式：設置安全庫存
    pub fn with_safety_stock(mut self, stock: Decimal) -> Self {
        self.safety_stock = stock;
        self
    }

    /// 檢查庫存是否低於再訂購點
    pub fn is_below_reorder_point(&self) -> bool {
        self.current_stock < self.reorder_point
    }
}

/// 庫存異動類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEventType {
    /// 耗用（扣減）
    Consumption,
    /// 收貨（增加）
    Receipt,
}

/// 庫存異動事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEvent {
    /// 物料ID
    pub material_id: String,

    /// 異動數量（正值）
    pub quantity: Decimal,

    /// 異動類型
    pub event_type: InventoryEventType,

    /// 異動時間
    pub occurred_at: DateTime<Utc>,
}

impl InventoryEvent {
    /// 創建耗用事件
    pub fn consumption(material_id: String, quantity: Decimal, occurred_at: DateTime<Utc>) -> Self {
        Self {
            material_id,
            quantity,
            event_type: InventoryEventType::Consumption,
            occurred_at,
        }
    }

    /// 創建收貨事件
    pub fn receipt(material_id: String, quantity: Decimal, occurred_at: DateTime<Utc>) -> Self {
        Self {
            material_id,
            quantity,
            event_type: InventoryEventType::Receipt,
            occurred_at,
        }
    }
}

/// 即將到期的批次（外部訊號，選擇性輸入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiringLot {
    /// 物料ID
    pub material_id: String,

    /// 批次數量
    pub quantity: Decimal,

    /// 到期日
    pub expires_on: NaiveDate,
}

/// 庫存狀態存儲
///
/// 唯一寫入者；耗用與收貨事件逐筆套用，
/// 導致負庫存的事件會被拒絕而非靜默截斷
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    records: HashMap<String, InventoryRecord>,
}

impl InventoryStore {
    /// 創建空的庫存存儲
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// 寫入或覆蓋庫存記錄（物料生命週期邊界使用）
    pub fn upsert(&mut self, record: InventoryRecord) {
        self.records.insert(record.material_id.clone(), record);
    }

    /// 讀取庫存記錄
    pub fn get(&self, material_id: &str) -> Option<&InventoryRecord> {
        self.records.get(material_id)
    }

    /// 套用庫存異動事件
    ///
    /// 耗用導致負庫存時回傳錯誤，記錄維持原狀
    pub fn apply_event(&mut self, event: &InventoryEvent) -> Result<()> {
        if event.quantity < Decimal::ZERO {
            return Err(ProcureError::CalculationError(format!(
                "異動數量不得為負: {}",
                event.quantity
            )));
        }

        let record = self.records.get_mut(&event.material_id).ok_or_else(|| {
            ProcureError::MissingInventoryState(event.material_id.clone())
        })?;

        match event.event_type {
            InventoryEventType::Consumption => {
                let new_stock = record.current_stock - event.quantity;
                if new_stock < Decimal::ZERO {
                    return Err(ProcureError::CalculationError(format!(
                        "庫存不得為負: 現有 {}, 耗用 {}",
                        record.current_stock, event.quantity
                    )));
                }
                record.current_stock = new_stock;
            }
            InventoryEventType::Receipt => {
                record.current_stock += event.quantity;
            }
        }

        record.last_updated = event.occurred_at;
        Ok(())
    }

    /// 取得一致性快照（決策週期讀取一次，不得中途重讀）
    pub fn snapshot(&self) -> HashMap<String, InventoryRecord> {
        self.records.clone()
    }

    /// 物料數量
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 檢查是否為空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(material_id: &str, stock: i64) -> InventoryStore {
        let mut store = InventoryStore::new();
        store.upsert(InventoryRecord::new(
            material_id.to_string(),
            Decimal::from(stock),
        ));
        store
    }

    #[test]
    fn test_apply_consumption_and_receipt() {
        let mut store = store_with("COIL-001", 100);

        store
            .apply_event(&InventoryEvent::consumption(
                "COIL-001".to_string(),
                Decimal::from(30),
                Utc::now(),
            ))
            .unwrap();
        assert_eq!(
            store.get("COIL-001").unwrap().current_stock,
            Decimal::from(70)
        );

        store
            .apply_event(&InventoryEvent::receipt(
                "COIL-001".to_string(),
                Decimal::from(50),
                Utc::now(),
            ))
            .unwrap();
        assert_eq!(
            store.get("COIL-001").unwrap().current_stock,
            Decimal::from(120)
        );
    }

    #[test]
    fn test_reject_negative_stock() {
        let mut store = store_with("COIL-002", 20);

        // 超量耗用應該被拒絕，庫存維持原狀
        let err = store
            .apply_event(&InventoryEvent::consumption(
                "COIL-002".to_string(),
                Decimal::from(50),
                Utc::now(),
            ))
            .unwrap_err();
        assert!(matches!(err, ProcureError::CalculationError(_)));
        assert_eq!(
            store.get("COIL-002").unwrap().current_stock,
            Decimal::from(20)
        );
    }

    #[test]
    fn test_missing_record_is_material_scoped() {
        let mut store = InventoryStore::new();

        let err = store
            .apply_event(&InventoryEvent::receipt(
                "UNKNOWN".to_string(),
                Decimal::from(10),
                Utc::now(),
            ))
            .unwrap_err();
        assert!(matches!(err, ProcureError::MissingInventoryState(_)));
        assert!(err.is_material_scoped());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = store_with("COIL-003", 40);
        let snapshot = store.snapshot();

        store
            .apply_event(&InventoryEvent::consumption(
                "COIL-003".to_string(),
                Decimal::from(10),
                Utc::now(),
            ))
            .unwrap();

        // 快照不受後續異動影響
        assert_eq!(
            snapshot.get("COIL-003").unwrap().current_stock,
            Decimal::from(40)
        );
        assert_eq!(
            store.get("COIL-003").unwrap().current_stock,
            Decimal::from(30)
        );
    }
}
