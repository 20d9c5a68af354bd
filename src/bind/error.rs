use thiserror::Error;

use crate::convert::ConversionError;
use crate::source::Origin;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    #[error("{}", missing_field_message(.key, .field, .origin))]
    MissingField {
        key: String,
        field: String,
        origin: Origin,
    },

    #[error("couldn't convert {field} ('{key}') to {type_name}. {source}")]
    Conversion {
        key: String,
        field: String,
        type_name: String,
        source: ConversionError,
    },

    #[error("failed to deserialize configuration: {0}")]
    Deserialize(#[from] toml::de::Error),
}

fn missing_field_message(key: &str, field: &str, origin: &Origin) -> String {
    let location = match origin {
        Origin::Environment => "is not an environment variable".to_string(),
        Origin::Named(name) => format!("does not exist in {name}"),
    };

    if key == field {
        format!("'{key}' {location}, nor has default value")
    } else {
        format!("'{key}' {location}, nor '{field}' has default value")
    }
}
