use std::fmt;

#[derive(Debug, Clone)]
pub enum MeetdashError {
    StoreConnection(String),
    StoreOperation(String),
    StoreBackendNotFound(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    FileOperation(String),
    DateParse(String),
    Config(String),
}

impl MeetdashError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            MeetdashError::StoreConnection(_) => "E001",
            MeetdashError::StoreOperation(_) => "E002",
            MeetdashError::StoreBackendNotFound(_) => "E003",
            MeetdashError::Validation(_) => "E004",
            MeetdashError::NotFound(_) => "E005",
            MeetdashError::Serialization(_) => "E006",
            MeetdashError::FileOperation(_) => "E007",
            MeetdashError::DateParse(_) => "E008",
            MeetdashError::Config(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            MeetdashError::StoreConnection(_) => "Store Connection Error",
            MeetdashError::StoreOperation(_) => "Store Operation Error",
            MeetdashError::StoreBackendNotFound(_) => "Store Backend Not Found",
            MeetdashError::Validation(_) => "Validation Error",
            MeetdashError::NotFound(_) => "Resource Not Found",
            MeetdashError::Serialization(_) => "Serialization Error",
            MeetdashError::FileOperation(_) => "File Operation Error",
            MeetdashError::DateParse(_) => "Date Parse Error",
            MeetdashError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            MeetdashError::StoreConnection(msg) => msg,
            MeetdashError::StoreOperation(msg) => msg,
            MeetdashError::StoreBackendNotFound(msg) => msg,
            MeetdashError::Validation(msg) => msg,
            MeetdashError::NotFound(msg) => msg,
            MeetdashError::Serialization(msg) => msg,
            MeetdashError::FileOperation(msg) => msg,
            MeetdashError::DateParse(msg) => msg,
            MeetdashError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for MeetdashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for MeetdashError {}

// 便捷的构造函数
impl MeetdashError {
    pub fn store_connection<T: Into<String>>(msg: T) -> Self {
        MeetdashError::StoreConnection(msg.into())
    }

    pub fn store_operation<T: Into<String>>(msg: T) -> Self {
        MeetdashError::StoreOperation(msg.into())
    }

    pub fn store_backend_not_found<T: Into<String>>(msg: T) -> Self {
        MeetdashError::StoreBackendNotFound(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        MeetdashError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        MeetdashError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        MeetdashError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        MeetdashError::FileOperation(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        MeetdashError::DateParse(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        MeetdashError::Config(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for MeetdashError {
    fn from(err: std::io::Error) -> Self {
        MeetdashError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for MeetdashError {
    fn from(err: serde_json::Error) -> Self {
        MeetdashError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for MeetdashError {
    fn from(err: chrono::ParseError) -> Self {
        MeetdashError::DateParse(err.to_string())
    }
}

impl From<config::ConfigError> for MeetdashError {
    fn from(err: config::ConfigError) -> Self {
        MeetdashError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MeetdashError>;
