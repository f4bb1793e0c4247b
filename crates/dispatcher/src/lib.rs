//! # Dispatcher
//!
//! 单消费者消息分发模块。
//!
//! 负责：
//! - 启动时校验 single-consumer 不变量
//! - 构建冻结的路由表（message type → consumer type）
//! - 每次分发在独立 resolution scope 内解析并调用消费者

pub mod dispatcher;
pub mod error;
pub mod metrics;

pub use contracts::{ConsumerResolver, Message};
pub use directory::MessageDirectory;
pub use dispatcher::SingleConsumerDispatcher;
pub use error::DispatchError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
