//! 分发指标记录模块
//!
//! 基于全局 metrics recorder 记录 dispatcher 的运行指标。

use metrics::{counter, histogram};

/// 记录一次成功分发
///
/// 每次 `dispatch_message` 返回 true 时调用。
pub fn record_message_dispatched(topic: &str, consumer_type: &str) {
    counter!(
        "bus_messages_dispatched_total",
        "topic" => topic.to_string(),
        "consumer" => consumer_type.to_string()
    )
    .increment(1);
}

/// 记录未路由消息（正常结果，非错误）
pub fn record_message_unrouted(topic: &str) {
    counter!(
        "bus_messages_unrouted_total",
        "topic" => topic.to_string()
    )
    .increment(1);
}

/// 记录分发失败
///
/// `phase` 为 "resolution" 或 "invocation"。
pub fn record_dispatch_failure(topic: &str, phase: &str) {
    counter!(
        "bus_dispatch_failures_total",
        "topic" => topic.to_string(),
        "phase" => phase.to_string()
    )
    .increment(1);
}

/// 记录单次分发耗时
pub fn record_dispatch_latency_ms(latency_ms: f64) {
    histogram!("bus_dispatch_latency_ms").record(latency_ms);
}
