//! Resolution of a single declared field against a source.

use tracing::debug;

use super::BindError;
use crate::class::FieldDescriptor;
use crate::convert::{ConverterRegistry, Value};
use crate::source::Source;

/// Resolves `field` from `source` under `prefix`.
///
/// A value present in the source always wins and is converted to the
/// declared type. Without one, the field's default is returned unconverted,
/// an optional field becomes [`Value::None`], and anything else is a
/// [`BindError::MissingField`]. A `None` default counts as no default.
pub fn resolve_field(
    field: &FieldDescriptor,
    prefix: &str,
    source: &dyn Source,
    converters: &ConverterRegistry,
) -> Result<Value, BindError> {
    let key = format!("{prefix}{}", field.name);

    let Some(raw) = source.get(&key) else {
        if let Some(default) = field.default.as_ref().filter(|v| !v.is_none()) {
            debug!(key = %key, "using default value");
            return Ok(default.clone());
        }
        if field.is_optional() {
            debug!(key = %key, "optional field absent");
            return Ok(Value::None);
        }
        return Err(BindError::MissingField {
            key,
            field: field.name.clone(),
            origin: source.origin(),
        });
    };

    debug!(key = %key, declared_type = %field.declared_type, "resolved from source");
    converters
        .convert(raw, &field.declared_type)
        .map_err(|e| BindError::Conversion {
            key,
            field: field.name.clone(),
            type_name: field.declared_type.to_string(),
            source: e,
        })
}
