use std::error::Error;
use std::fmt;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum StrangerSocksError {
    // Engine errors
    EngineLock(String),

    // Delivery errors
    OutboxFull(String),
    OutboxClosed(String),

    // Messages errors
    MessageParseError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for StrangerSocksError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineLock(msg) => write!(f, "Engine lock error: {}", msg),
            Self::OutboxFull(id) => write!(f, "Outbox full for participant {}", id),
            Self::OutboxClosed(id) => write!(f, "Outbox closed for participant {}", id),
            Self::MessageParseError(msg) => write!(f, "Message parse error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for StrangerSocksError {}

// Converting from PoisonError to facilitate poisoned mutex handling
impl<T> From<PoisonError<T>> for StrangerSocksError {
    fn from(err: PoisonError<T>) -> Self {
        StrangerSocksError::EngineLock(format!("Mutex poisoned: {}", err))
    }
}

// Generic result type for StrangerSocks
pub type Result<T> = std::result::Result<T, StrangerSocksError>;
