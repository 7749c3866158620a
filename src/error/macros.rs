//! # 错误处理宏

/// 快速创建配置错误的宏
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::EvalError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::EvalError::config(format!($fmt, $($arg)*))
    };
}

/// 快速创建验证错误的宏，可选携带字段名
#[macro_export]
macro_rules! validation_error {
    (field = $field:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::error::EvalError::validation(format!($fmt $(, $arg)*), Some($field.to_string()))
    };
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::error::EvalError::validation(format!($fmt $(, $arg)*), None)
    };
}

/// 确保条件成立，否则返回配置错误
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::config_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::config_error!($fmt, $($arg)*));
        }
    };
}

/// 确保条件成立，否则返回验证错误
#[macro_export]
macro_rules! ensure_validation {
    ($cond:expr, field = $field:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::validation_error!(field = $field, $($arg)*));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::validation_error!($($arg)*));
        }
    };
}
