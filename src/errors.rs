use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkforgeError {
    Validation(String),
    AliasTaken(String),
    AllocationExhausted(String),
    NotFound(String),
    DatabaseOperation(String),
    Serialization(String),
    Configuration(String),
}

impl LinkforgeError {
    /// Stable error code, used in logs and monitoring.
    pub fn code(&self) -> &'static str {
        match self {
            LinkforgeError::Validation(_) => "E001",
            LinkforgeError::AliasTaken(_) => "E002",
            LinkforgeError::AllocationExhausted(_) => "E003",
            LinkforgeError::NotFound(_) => "E004",
            LinkforgeError::DatabaseOperation(_) => "E005",
            LinkforgeError::Serialization(_) => "E006",
            LinkforgeError::Configuration(_) => "E007",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            LinkforgeError::Validation(_) => "Validation Error",
            LinkforgeError::AliasTaken(_) => "Alias Already Taken",
            LinkforgeError::AllocationExhausted(_) => "Code Allocation Exhausted",
            LinkforgeError::NotFound(_) => "Resource Not Found",
            LinkforgeError::DatabaseOperation(_) => "Database Operation Error",
            LinkforgeError::Serialization(_) => "Serialization Error",
            LinkforgeError::Configuration(_) => "Configuration Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LinkforgeError::Validation(msg) => msg,
            LinkforgeError::AliasTaken(msg) => msg,
            LinkforgeError::AllocationExhausted(msg) => msg,
            LinkforgeError::NotFound(msg) => msg,
            LinkforgeError::DatabaseOperation(msg) => msg,
            LinkforgeError::Serialization(msg) => msg,
            LinkforgeError::Configuration(msg) => msg,
        }
    }
}

impl fmt::Display for LinkforgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for LinkforgeError {}

// 便捷的构造函数
impl LinkforgeError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::Validation(msg.into())
    }

    pub fn alias_taken<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::AliasTaken(msg.into())
    }

    pub fn allocation_exhausted<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::AllocationExhausted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::NotFound(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::Serialization(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        LinkforgeError::Configuration(msg.into())
    }
}

impl From<serde_json::Error> for LinkforgeError {
    fn from(err: serde_json::Error) -> Self {
        LinkforgeError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(LinkforgeError::validation("x").code(), "E001");
        assert_eq!(LinkforgeError::alias_taken("x").code(), "E002");
        assert_eq!(LinkforgeError::allocation_exhausted("x").code(), "E003");
        assert_eq!(LinkforgeError::not_found("x").code(), "E004");
    }

    #[test]
    fn test_display_format() {
        let err = LinkforgeError::validation("alias too short");
        assert_eq!(err.to_string(), "Validation Error: alias too short");
    }
}
