//! # 管理API处理器
//!
//! 每个处理器只负责提取参数、调用服务层并提交会话。

pub mod datasets;
pub mod models;
pub mod results;
pub mod runs;
pub mod system;
