//! # 管理API模块
//!
//! 提供评测数据的 RESTful API 接口

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;
pub mod services;

pub use routes::create_routes;
pub use server::{AppState, ManagementServer, create_router};
