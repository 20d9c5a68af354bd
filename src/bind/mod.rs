//! Binding configuration classes to sources.

mod error;
mod extract;
mod inject;
mod resolve;

use std::path::Path;

use serde::de::DeserializeOwned;

pub use error::BindError;
pub use extract::extract;
pub use inject::{inject, BoundClass};
pub use resolve::resolve_field;

use crate::class::Class;
use crate::convert::{Converter, ConverterRegistry};
use crate::source::{EnvironmentSource, Source, SourceError, DEFAULT_DOT_ENV_PATH};

/// What happens to a class once its fields are injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOptions {
    /// Reject attribute writes on the class and its instances.
    pub frozen: bool,
    /// Replace the constructor with one that takes no arguments and
    /// assigns nothing.
    pub override_init: bool,
    /// Generate a `Name(field=value,...)` representation for instances.
    pub override_repr: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            frozen: true,
            override_init: true,
            override_repr: true,
        }
    }
}

/// Binds configuration classes against one source.
///
/// Each declared field `NAME` is looked up as `prefix + NAME`. Values found
/// in the source are converted to the declared type; otherwise the field's
/// default applies, optional fields become `None`, and anything else fails
/// the whole binding.
///
/// A binder can be reused for any number of classes.
///
/// ## Example
///
/// ```
/// use dragon_env::{Attributes, Binder, Class, ClassObject, MapSource, TypeExpr, Value};
///
/// let source = MapSource::new([("APP_HOST", "localhost"), ("APP_PORT", "8080")]);
/// let binder = Binder::new(source).with_prefix("APP_");
///
/// let server = binder.bind(
///     Class::new("Server")
///         .field("HOST", TypeExpr::STR)
///         .field("PORT", TypeExpr::INT)
///         .field("DEBUG", "Optional[bool]"),
/// )?;
///
/// assert_eq!(server.get_attr("PORT"), Some(&Value::Int(8080)));
/// assert_eq!(server.get_attr("DEBUG"), Some(&Value::None));
/// assert!(server.is_frozen());
/// # Ok::<(), dragon_env::BindError>(())
/// ```
///
/// With the process environment and a `.env` file:
///
/// ```no_run
/// use dragon_env::{Binder, Class, TypeExpr};
///
/// let config = Binder::from_env()?
///     .with_prefix("MYAPP_")
///     .bind(Class::new("Config").field("DATABASE_URL", TypeExpr::STR))?;
/// # Ok::<(), dragon_env::Error>(())
/// ```
#[derive(Debug)]
#[must_use = "binders do nothing until .bind() is called"]
pub struct Binder<S> {
    source: S,
    prefix: String,
    options: BindOptions,
    converters: ConverterRegistry,
}

impl<S: Source> Binder<S> {
    /// Creates a binder over `source` with no prefix, default options and
    /// the built-in converters.
    pub fn new(source: S) -> Self {
        Self {
            source,
            prefix: String::new(),
            options: BindOptions::default(),
            converters: ConverterRegistry::default(),
        }
    }

    /// Prepended to every field name to form the lookup key.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replaces all options at once.
    pub fn with_options(mut self, options: BindOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether bound classes are frozen.
    pub fn frozen(mut self, frozen: bool) -> Self {
        self.options.frozen = frozen;
        self
    }

    /// Whether the constructor is replaced with an empty one.
    pub fn override_init(mut self, override_init: bool) -> Self {
        self.options.override_init = override_init;
        self
    }

    /// Whether instances get a generated representation.
    pub fn override_repr(mut self, override_repr: bool) -> Self {
        self.options.override_repr = override_repr;
        self
    }

    /// Registers a converter after the built-ins.
    pub fn with_converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converters.register(converter);
        self
    }

    /// Registers a converter ahead of the built-ins.
    pub fn with_converter_first(mut self, converter: impl Converter + 'static) -> Self {
        self.converters.register_first(converter);
        self
    }

    /// Returns the source fields are looked up in.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the lookup key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the current options.
    pub fn options(&self) -> BindOptions {
        self.options
    }

    /// Injects every declared field of `class` and applies the options.
    pub fn bind(&self, class: Class) -> Result<BoundClass, BindError> {
        inject(
            class,
            &self.prefix,
            &self.source,
            &self.converters,
            self.options,
        )
    }

    /// Binds `class` and deserializes the result into `T`.
    pub fn bind_into<T: DeserializeOwned>(&self, class: Class) -> Result<T, BindError> {
        let bound = self.bind(class)?;
        extract(bound.as_ref())
    }
}

impl Binder<EnvironmentSource> {
    /// Binds against the process environment layered over `.env`.
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_env_with(Some(Path::new(DEFAULT_DOT_ENV_PATH)))
    }

    /// Binds against the process environment layered over `dot_env_path`,
    /// or the environment alone when `None`.
    pub fn from_env_with(dot_env_path: Option<&Path>) -> Result<Self, SourceError> {
        Ok(Self::new(EnvironmentSource::load(dot_env_path)?))
    }
}

/// Binds `class` with default options against the process environment
/// layered over `.env`.
pub fn bind_env(class: Class) -> Result<BoundClass, crate::Error> {
    Ok(Binder::from_env()?.bind(class)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::convert::{ConversionError, TypeExpr, Value};
    use crate::source::MapSource;

    fn environment() -> EnvironmentSource {
        EnvironmentSource::from_layers(
            [
                ("SOME_A", "value_a"),
                ("SOME_B", "value_b"),
                ("SOME_INT", "42"),
                ("LIST_STRING", "a,b,c"),
                ("LIST_INTEGERS", "420, 69"),
                ("DICT_ENV", r#"{"key": "value", "a":42}"#),
                ("DICT_MULTILEVEL", r#"{"key": [{"a":42},{"a":4.2},{"a":"42"}]}"#),
                ("ZXC_SOME_A", "prefixed_a"),
                ("ZXC_SOME_B", "prefixed_a"),
            ],
            [],
        )
    }

    #[test]
    fn test_end_to_end() {
        let bound = Binder::new(environment())
            .bind(
                Class::new("Test")
                    .field("SOME_A", TypeExpr::STR)
                    .field("SOME_INT", TypeExpr::INT),
            )
            .unwrap();

        assert_eq!(bound.get_attr("SOME_A"), Some(&Value::from("value_a")));
        assert_eq!(bound.get_attr("SOME_INT"), Some(&Value::Int(42)));
    }

    #[test]
    fn test_injection_with_prefix() {
        let bound = Binder::new(environment())
            .with_prefix("SOME_")
            .bind(
                Class::new("Test")
                    .field("A", TypeExpr::STR)
                    .field("B", TypeExpr::STR)
                    .field("INT", TypeExpr::INT),
            )
            .unwrap();

        assert_eq!(bound.get_attr("A"), Some(&Value::from("value_a")));
        assert_eq!(bound.get_attr("B"), Some(&Value::from("value_b")));
        assert_eq!(bound.get_attr("INT"), Some(&Value::Int(42)));
    }

    #[test]
    fn test_list_injection() {
        let bound = Binder::new(environment())
            .bind(
                Class::new("Test")
                    .field("LIST_STRING", "list")
                    .field("LIST_INTEGERS", "List[int]"),
            )
            .unwrap();

        assert_eq!(bound.get_attr("LIST_STRING"), Some(&Value::from(vec!["a", "b", "c"])));
        assert_eq!(bound.get_attr("LIST_INTEGERS"), Some(&Value::from(vec![420, 69])));
    }

    #[test]
    fn test_missing_field_with_and_without_default() {
        let binder = Binder::new(environment());

        let err = binder
            .bind(
                Class::new("Test")
                    .field("SOME_A", TypeExpr::STR)
                    .field("NOT_EXIST", "List[int]"),
            )
            .unwrap_err();
        assert!(matches!(err, BindError::MissingField { .. }));

        let bound = binder
            .bind(
                Class::new("Test")
                    .field("SOME_A", TypeExpr::STR)
                    .field_with_default("NOT_EXIST", "List[int]", vec![1, 2]),
            )
            .unwrap();
        assert_eq!(bound.get_attr("NOT_EXIST"), Some(&Value::from(vec![1, 2])));
    }

    #[test]
    fn test_cast_errors() {
        let binder = Binder::new(environment());

        for class in [
            Class::new("Test").field("SOME_A", TypeExpr::INT),
            Class::new("Test").field("LIST_STRING", "List[int]"),
        ] {
            assert!(matches!(
                binder.bind(class),
                Err(BindError::Conversion {
                    source: ConversionError::InvalidInt { .. },
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_dict_injection() {
        let binder = Binder::new(environment());
        for spelling in ["dict", "Dict"] {
            let bound = binder
                .bind(Class::new("Test").field("DICT_ENV", spelling))
                .unwrap();
            let dict = bound.get_attr("DICT_ENV").and_then(Value::as_structured).unwrap();

            assert_eq!(dict.as_object().map(|m| m.len()), Some(2));
            assert_eq!(dict["key"], "value");
            assert_eq!(dict["a"], 42);
        }
    }

    #[test]
    fn test_multilevel_dict_injection() {
        let bound = Binder::new(environment())
            .bind(Class::new("Test").field("DICT_MULTILEVEL", TypeExpr::Dict))
            .unwrap();
        let dict = bound.get_attr("DICT_MULTILEVEL").and_then(Value::as_structured).unwrap();
        let arr = dict["key"].as_array().unwrap();

        assert_eq!(arr.len(), 3);
        assert_eq!(arr[0]["a"], 42);
        assert_eq!(arr[1]["a"], 4.2);
        assert_eq!(arr[2]["a"], "42");
    }

    #[test]
    fn test_options_builder() {
        let binder = Binder::new(MapSource::default())
            .frozen(false)
            .override_init(false)
            .override_repr(false);

        assert_eq!(
            binder.options(),
            BindOptions {
                frozen: false,
                override_init: false,
                override_repr: false,
            }
        );
        assert!(!binder.bind(Class::new("Test")).unwrap().is_frozen());
    }

    #[test]
    fn test_custom_converter_through_binder() {
        #[derive(Debug)]
        struct Upper;

        impl Converter for Upper {
            fn can_convert(&self, target: &TypeExpr) -> bool {
                *target == TypeExpr::other("Upper")
            }

            fn convert(&self, raw: &str, _target: &TypeExpr) -> Result<Value, ConversionError> {
                Ok(Value::Str(raw.to_uppercase()))
            }
        }

        let binder = Binder::new(environment());
        assert!(binder.bind(Class::new("Test").field("SOME_A", "Upper")).is_err());

        let bound = Binder::new(environment())
            .with_converter(Upper)
            .bind(Class::new("Test").field("SOME_A", "Optional[Upper]"))
            .unwrap();
        assert_eq!(bound.get_attr("SOME_A"), Some(&Value::from("VALUE_A")));
    }

    #[test]
    fn test_dotfile_values_are_defaults_for_environment() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SOME_A=from_dotfile").unwrap();
        writeln!(file, "DOT_ONLY=dot").unwrap();

        let source = environment().with_dot_env(file.path()).unwrap();
        let bound = Binder::new(source)
            .bind(
                Class::new("Test")
                    .field("SOME_A", TypeExpr::STR)
                    .field("DOT_ONLY", TypeExpr::STR),
            )
            .unwrap();

        assert_eq!(bound.get_attr("SOME_A"), Some(&Value::from("value_a")));
        assert_eq!(bound.get_attr("DOT_ONLY"), Some(&Value::from("dot")));
    }

    #[test]
    fn test_shared_source_by_reference() {
        let source = environment();
        let first = Binder::new(&source).bind(Class::new("A").field("SOME_A", TypeExpr::STR));
        let second = Binder::new(&source)
            .with_prefix("ZXC_")
            .bind(Class::new("B").field("SOME_A", TypeExpr::STR));

        assert_eq!(first.unwrap().get_attr("SOME_A"), Some(&Value::from("value_a")));
        assert_eq!(second.unwrap().get_attr("SOME_A"), Some(&Value::from("prefixed_a")));
    }

    #[test]
    fn test_from_env_default_dotfile() {
        let binder = Binder::from_env().unwrap();
        assert!(binder.bind(Class::new("Empty")).unwrap().declared_fields().is_empty());
    }

    #[test]
    fn test_bind_env() {
        let bound = bind_env(Class::new("Empty")).unwrap();
        assert!(bound.is_frozen());

        let err = bind_env(Class::new("Test").field("DRAGON_ENV_UNSET_VARIABLE", TypeExpr::STR))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Bind(BindError::MissingField { ref key, .. })
                if key == "DRAGON_ENV_UNSET_VARIABLE"
        ));
        assert!(err.to_string().contains("is not an environment variable"));
    }

    #[test]
    fn test_from_env_without_dotfile() {
        let binder = Binder::from_env_with(None).unwrap();
        let bound = binder.bind(Class::new("Empty")).unwrap();
        assert!(bound.declared_fields().is_empty());
    }
}
