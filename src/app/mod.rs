//! 应用级共享对象

pub mod context;

pub use context::AppContext;
