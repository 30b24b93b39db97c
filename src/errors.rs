//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_edumarket_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EduMarketError {
            $($variant(String),)*
        }

        impl EduMarketError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EduMarketError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EduMarketError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EduMarketError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EduMarketError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EduMarketError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_edumarket_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    Conflict("E008", "Resource Conflict"),
    Serialization("E009", "Serialization Error"),
    Authentication("E010", "Authentication Error"),
    Authorization("E011", "Authorization Error"),
    Upstream("E012", "Upstream Service Error"),
    AnalysisRejected("E013", "Analysis Rejected"),
    Io("E014", "IO Error"),
    CapacityExceeded("E015", "Capacity Exceeded"),
}

impl EduMarketError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EduMarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EduMarketError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EduMarketError {
    fn from(err: sea_orm::DbErr) -> Self {
        EduMarketError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EduMarketError {
    fn from(err: std::io::Error) -> Self {
        EduMarketError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for EduMarketError {
    fn from(err: reqwest::Error) -> Self {
        EduMarketError::Upstream(err.to_string())
    }
}

impl From<serde_json::Error> for EduMarketError {
    fn from(err: serde_json::Error) -> Self {
        EduMarketError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EduMarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EduMarketError::cache_connection("test").code(), "E001");
        assert_eq!(EduMarketError::database_config("test").code(), "E003");
        assert_eq!(EduMarketError::validation("test").code(), "E006");
        assert_eq!(EduMarketError::authentication("test").code(), "E010");
        assert_eq!(EduMarketError::analysis_rejected("test").code(), "E013");
        assert_eq!(EduMarketError::capacity_exceeded("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EduMarketError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            EduMarketError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EduMarketError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = EduMarketError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_from_serde_error() {
        let err: EduMarketError = serde_json::from_str::<i32>("oops").unwrap_err().into();
        assert_eq!(err.code(), "E009");
    }
}
