//! 日誌初始化

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化結構化日誌
///
/// 過濾層級由 `RUST_LOG` 控制，未設置時預設 `info`；
/// 重複呼叫時保留先前的訂閱者
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
