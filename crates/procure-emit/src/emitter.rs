//! 發佈器

use procure_core::{Alert, ProcureError, ProcurementDecision};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::sink::EmitSink;

/// 發佈記錄（JSON 載荷的外層封套）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "record_type", rename_all = "snake_case")]
pub enum EmitRecord {
    Decision(ProcurementDecision),
    Alert(Alert),
}

/// 待投遞載荷
#[derive(Debug, Clone)]
struct PendingDelivery {
    sink_name: String,
    payload: String,
    attempts: u32,
}

/// 發佈器
///
/// 每筆記錄對每個目的地各排一份載荷；投遞失敗的載荷留在佇列，
/// 下次 flush 先重試舊載荷再送新載荷（at-least-once）
#[derive(Default)]
pub struct Emitter {
    sinks: Vec<Box<dyn EmitSink>>,
    pending: Vec<PendingDelivery>,
}

impl Emitter {
    /// 創建沒有目的地的發佈器
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// 註冊發佈目的地
    pub fn register(&mut self, sink: Box<dyn EmitSink>) {
        self.sinks.push(sink);
    }

    /// 排入決策記錄
    pub fn enqueue_decisions(
        &mut self,
        decisions: &[ProcurementDecision],
    ) -> procure_core::Result<()> {
        for decision in decisions {
            self.enqueue(&EmitRecord::Decision(decision.clone()))?;
        }
        Ok(())
    }

    /// 排入警報記錄
    pub fn enqueue_alerts(&mut self, alerts: &[Alert]) -> procure_core::Result<()> {
        for alert in alerts {
            self.enqueue(&EmitRecord::Alert(alert.clone()))?;
        }
        Ok(())
    }

    /// 排入單一記錄（對每個已註冊目的地各一份）
    pub fn enqueue(&mut self, record: &EmitRecord) -> procure_core::Result<()> {
        let payload = serde_json::to_string(record)
            .map_err(|e| ProcureError::CalculationError(format!("載荷序列化失敗: {}", e)))?;

        for sink in &self.sinks {
            self.pending.push(PendingDelivery {
                sink_name: sink.name().to_string(),
                payload: payload.clone(),
                attempts: 0,
            });
        }
        Ok(())
    }

    /// 投遞佇列中的載荷，回傳成功筆數
    ///
    /// 失敗的載荷留在佇列，投遞順序維持排入順序
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        let mut remaining = Vec::new();

        for mut delivery in std::mem::take(&mut self.pending) {
            let sink = self
                .sinks
                .iter()
                .find(|s| s.name() == delivery.sink_name);

            match sink {
                Some(sink) => match sink.deliver(&delivery.payload) {
                    Ok(()) => delivered += 1,
                    Err(reason) => {
                        delivery.attempts += 1;
                        warn!(
                            sink = %delivery.sink_name,
                            attempts = delivery.attempts,
                            reason = %reason,
                            "投遞失敗，留佇列重試"
                        );
                        remaining.push(delivery);
                    }
                },
                None => {
                    // 目的地已移除：載荷丟棄並記錄
                    warn!(sink = %delivery.sink_name, "目的地不存在，載荷丟棄");
                }
            }
        }

        self.pending = remaining;
        delivered
    }

    /// 佇列中的載荷數
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
