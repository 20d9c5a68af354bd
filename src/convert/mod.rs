//! Value conversion from raw source strings.

mod error;
mod registry;
mod types;
mod value;

pub use error::ConversionError;
pub use registry::{Converter, ConverterRegistry};
pub use types::{Primitive, TypeExpr};
pub use value::Value;
