use thiserror::Error;

/// Ошибки синхронизации остатков
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request timed out: {0}")]
    TransportTimeout(String),

    #[error("Connection failed: {0}")]
    ConnectionFailure(String),

    #[error("Server responded with status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Unexpected data: {0}")]
    DataShape(String),

    #[error("Pagination stalled: {0}")]
    PaginationStalled(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn data_shape(message: impl Into<String>) -> Self {
        Self::DataShape(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Имеет ли смысл повторить запуск без изменений
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportTimeout(_) | Self::ConnectionFailure(_) => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            Self::DataShape(_) | Self::PaginationStalled(_) | Self::Config(_) => false,
        }
    }

    /// Сообщение для оператора (выводится в консоль при падении запуска)
    pub fn user_message(&self) -> String {
        match self {
            Self::TransportTimeout(_) => "Превышено время ожидания...".to_string(),
            Self::ConnectionFailure(cause) => format!("{} Ошибка соединения", cause),
            other => format!("{} ERROR", other),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::TransportTimeout(e.to_string())
        } else if e.is_connect() || e.is_request() {
            Self::ConnectionFailure(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Server {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else if e.is_decode() {
            Self::DataShape(e.to_string())
        } else {
            Self::ConnectionFailure(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        Self::DataShape(format!("invalid JSON: {}", e))
    }
}

impl From<zip::result::ZipError> for SyncError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::DataShape(format!("invalid remnants archive: {}", e))
    }
}

impl From<calamine::Error> for SyncError {
    fn from(e: calamine::Error) -> Self {
        Self::DataShape(format!("invalid remnants spreadsheet: {}", e))
    }
}
