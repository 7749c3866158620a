//! # 管理端服务层
//!
//! 各资源的业务逻辑，接收任意 `ConnectionTrait`（连接或事务），供 HTTP handler 和测试复用。

pub mod datasets;
pub mod models;
pub mod results;
pub mod runs;
pub mod system;
