//! 發佈目的地

use tracing::info;

/// 發佈目的地介面
///
/// 投遞失敗回傳錯誤描述，載荷由發佈器保留重試
pub trait EmitSink: Send + Sync {
    /// 目的地名稱（記錄與除錯用）
    fn name(&self) -> &str;

    /// 投遞單一 JSON 載荷
    fn deliver(&self, payload: &str) -> std::result::Result<(), String>;
}

/// 寫入結構化日誌的目的地（預設的最小下游）
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl EmitSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn deliver(&self, payload: &str) -> std::result::Result<(), String> {
        info!(payload, "發佈記錄");
        Ok(())
    }
}
