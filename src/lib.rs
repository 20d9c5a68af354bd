//! Declarative binding of configuration classes to environment variables.
//!
//! A [`Class`] declares typed fields. A [`Binder`] looks each field up in a
//! [`Source`] (the process environment over a `.env` file, or any other
//! map), converts it through a [`ConverterRegistry`], installs the values on
//! the class and, by default, freezes it.

pub mod bind;
pub mod class;
pub mod convert;
mod error;
pub mod source;

pub use bind::{bind_env, extract, BindError, BindOptions, Binder, BoundClass};
pub use class::{
    freeze, AttributeError, Attributes, Class, ClassObject, Constructor, FieldDescriptor, Frozen,
    FrozenError, Instance, Object,
};
pub use convert::{ConversionError, Converter, ConverterRegistry, Primitive, TypeExpr, Value};
pub use error::Error;
pub use source::{EnvironmentSource, MapSource, Origin, Source, SourceError};
