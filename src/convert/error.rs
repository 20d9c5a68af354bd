use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use super::registry::{FALSY_VALUES, TRUTHY_VALUES};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConversionError {
    #[error("unsupported type for conversion: '{0}'")]
    Unsupported(String),

    #[error("invalid literal for int: '{value}': {source}")]
    InvalidInt {
        value: String,
        source: ParseIntError,
    },

    #[error("could not convert string to float: '{value}': {source}")]
    InvalidFloat {
        value: String,
        source: ParseFloatError,
    },

    #[error(
        "could not convert string to bool: '{value}'. truthy values: {truthy:?}, falsy values: {falsy:?}",
        truthy = TRUTHY_VALUES,
        falsy = FALSY_VALUES
    )]
    InvalidBool { value: String },

    #[error("invalid structured value: {0}")]
    InvalidStructured(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

impl ConversionError {
    /// Builds an error for a user-registered converter.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}
