use std::io;

use figment::Error as ConfigError;
use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum AutoMergeError {
    #[error("IO Error: {source:#?}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Configuration Error: {source:#?}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("Unable to (de)serialize JSON: {source:#?}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Merge schedule not found: '{0}'")]
    ScheduleNotFound(String),
}

