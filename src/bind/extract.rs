//! Typed extraction of bound classes into plain Rust structs.

use serde::de::DeserializeOwned;
use toml::{Table, Value as TomlValue};

use super::BindError;
use crate::class::ClassObject;
use crate::convert::Value;

/// Deserializes the declared fields of `class` into `T`.
///
/// Field names are used as keys verbatim, so `T` usually carries
/// `#[serde(rename_all = "SCREAMING_SNAKE_CASE")]` or explicit renames.
/// Fields holding [`Value::None`] are left out and read as missing, which
/// `Option` fields accept.
///
/// ```
/// use dragon_env::{extract, Binder, Class, MapSource, TypeExpr};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// let source = MapSource::new([("HOST", "localhost"), ("PORT", "8080")]);
/// let class = Class::new("Server")
///     .field("HOST", TypeExpr::STR)
///     .field("PORT", TypeExpr::INT);
///
/// let bound = Binder::new(source).bind(class)?;
/// let server: Server = extract(bound.as_ref())?;
/// assert_eq!(server.port, 8080);
/// # Ok::<(), dragon_env::Error>(())
/// ```
pub fn extract<T: DeserializeOwned>(class: &dyn ClassObject) -> Result<T, BindError> {
    let mut table = Table::new();
    for field in class.declared_fields() {
        if let Some(value) = class.get_attr(&field.name).and_then(to_toml) {
            table.insert(field.name, value);
        }
    }

    TomlValue::Table(table)
        .try_into()
        .map_err(BindError::Deserialize)
}

fn to_toml(value: &Value) -> Option<TomlValue> {
    match value {
        Value::None => None,
        Value::Str(s) => Some(TomlValue::String(s.clone())),
        Value::Bool(b) => Some(TomlValue::Boolean(*b)),
        Value::Int(i) => Some(TomlValue::Integer(*i)),
        Value::Float(f) => Some(TomlValue::Float(*f)),
        Value::List(items) => Some(TomlValue::Array(items.iter().filter_map(to_toml).collect())),
        Value::Structured(json) => json_to_toml(json),
    }
}

/// TOML has no null, so JSON nulls are dropped wherever they appear.
fn json_to_toml(json: &serde_json::Value) -> Option<TomlValue> {
    match json {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(TomlValue::Boolean(*b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(TomlValue::Integer)
            .or_else(|| n.as_f64().map(TomlValue::Float)),
        serde_json::Value::String(s) => Some(TomlValue::String(s.clone())),
        serde_json::Value::Array(items) => Some(TomlValue::Array(
            items.iter().filter_map(json_to_toml).collect(),
        )),
        serde_json::Value::Object(map) => Some(TomlValue::Table(
            map.iter()
                .filter_map(|(k, v)| Some((k.clone(), json_to_toml(v)?)))
                .collect(),
        )),
    }
}
