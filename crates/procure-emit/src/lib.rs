//! # Procure Emit
//!
//! 決策與警報的下游發佈層
//!
//! 發佈語意為 at-least-once：投遞失敗的載荷留在佇列，
//! 下次 flush 重試；下游須以記錄ID去重

pub mod emitter;
pub mod sink;

pub use emitter::{EmitRecord, Emitter};
pub use sink::{EmitSink, LogSink};
