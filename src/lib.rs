//! # EvalMatrix Backend Library
//!
//! LLM 评测数据管理后端：模型配置、数据集、评测任务与结果的 REST API，
//! 以及旧版浏览器本地存储数据的迁移工具

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod management;
pub mod seed;

// Re-export commonly used types
pub use config::AppConfig;
pub use database::Storage;
pub use error::{EvalError, Result};
