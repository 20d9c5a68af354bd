//! Type-directed string conversion.
//!
//! The registry holds an ordered list of [`Converter`]s. Optional types are
//! unwrapped first, then the first converter whose `can_convert` accepts the
//! target type performs the conversion. Built-ins are registered as `str`,
//! `int`, `float`, `bool`, `list`, `dict`.

use std::fmt;

use tracing::trace;

use super::{ConversionError, Primitive, TypeExpr, Value};

pub(crate) const TRUTHY_VALUES: [&str; 4] = ["1", "y", "yes", "true"];
pub(crate) const FALSY_VALUES: [&str; 5] = ["", "0", "n", "no", "false"];

/// Converts raw source strings into values of one or more target types.
pub trait Converter: Send + Sync + fmt::Debug {
    fn can_convert(&self, target: &TypeExpr) -> bool;

    fn convert(&self, raw: &str, target: &TypeExpr) -> Result<Value, ConversionError>;
}

/// Ordered set of converters consulted by the field resolver.
#[derive(Debug)]
pub struct ConverterRegistry {
    converters: Vec<Box<dyn Converter>>,
}

impl ConverterRegistry {
    /// A registry with no converters, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Appends a converter. Earlier converters, including the built-ins,
    /// keep priority for the types they accept.
    pub fn register(&mut self, converter: impl Converter + 'static) {
        self.converters.push(Box::new(converter));
    }

    /// Registers a converter ahead of every other one.
    pub fn register_first(&mut self, converter: impl Converter + 'static) {
        self.converters.insert(0, Box::new(converter));
    }

    /// Returns the number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns `true` if no converter is registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Whether some converter accepts `target` once optional is unwrapped.
    pub fn can_convert(&self, target: &TypeExpr) -> bool {
        let target = target.unwrap_optional();
        self.converters.iter().any(|c| c.can_convert(target))
    }

    /// Converts `raw` with the first converter that accepts `target`.
    pub fn convert(&self, raw: &str, target: &TypeExpr) -> Result<Value, ConversionError> {
        let target = target.unwrap_optional();
        let converter = self
            .converters
            .iter()
            .find(|c| c.can_convert(target))
            .ok_or_else(|| ConversionError::Unsupported(target.to_string()))?;

        trace!(target_type = %target, ?converter, "dispatching conversion");
        converter.convert(raw, target)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(PrimitiveConverter(Primitive::Str));
        registry.register(PrimitiveConverter(Primitive::Int));
        registry.register(PrimitiveConverter(Primitive::Float));
        registry.register(PrimitiveConverter(Primitive::Bool));
        registry.register(ListConverter);
        registry.register(DictConverter);
        registry
    }
}

#[derive(Debug, Clone, Copy)]
struct PrimitiveConverter(Primitive);

impl Converter for PrimitiveConverter {
    fn can_convert(&self, target: &TypeExpr) -> bool {
        *target == TypeExpr::Primitive(self.0)
    }

    fn convert(&self, raw: &str, _target: &TypeExpr) -> Result<Value, ConversionError> {
        convert_primitive(raw, self.0)
    }
}

/// Splits on `,` without trimming; typed elements go through the primitive
/// parsers, which tolerate surrounding whitespace for numbers.
#[derive(Debug, Clone, Copy)]
struct ListConverter;

impl Converter for ListConverter {
    fn can_convert(&self, target: &TypeExpr) -> bool {
        target.is_list()
    }

    fn convert(&self, raw: &str, target: &TypeExpr) -> Result<Value, ConversionError> {
        let element = match target {
            TypeExpr::List(Some(element)) => match &**element {
                TypeExpr::Primitive(primitive) => *primitive,
                _ => return Err(ConversionError::Unsupported(target.to_string())),
            },
            _ => Primitive::Str,
        };

        raw.split(',')
            .map(|item| convert_primitive(item, element))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }
}

#[derive(Debug, Clone, Copy)]
struct DictConverter;

impl Converter for DictConverter {
    fn can_convert(&self, target: &TypeExpr) -> bool {
        target.is_dict()
    }

    fn convert(&self, raw: &str, _target: &TypeExpr) -> Result<Value, ConversionError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Ok(Value::Structured(value))
    }
}

fn convert_primitive(raw: &str, primitive: Primitive) -> Result<Value, ConversionError> {
    match primitive {
        Primitive::Str => Ok(Value::Str(raw.to_string())),
        Primitive::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|source| ConversionError::InvalidInt {
                value: raw.to_string(),
                source,
            }),
        Primitive::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|source| ConversionError::InvalidFloat {
                value: raw.to_string(),
                source,
            }),
        Primitive::Bool => to_bool(raw).map(Value::Bool),
    }
}

fn to_bool(raw: &str) -> Result<bool, ConversionError> {
    let lowered = raw.to_lowercase();
    if TRUTHY_VALUES.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSY_VALUES.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(ConversionError::InvalidBool {
            value: raw.to_string(),
        })
    }
}
