//! Configuration classes: the targets a binder injects values into.
//!
//! A [`Class`] plays the role of a type object. It declares fields, carries
//! class-level attributes and a constructor, and may extend a base class.
//! [`Instance`]s read through to their class. Wrapping either in [`Frozen`]
//! blocks every write while leaving reads untouched.

mod definition;
mod error;
mod field;
mod frozen;
mod instance;

use std::fmt;

use crate::convert::Value;

pub use definition::{Class, Constructor};
pub use error::AttributeError;
pub use field::FieldDescriptor;
pub use frozen::{freeze, Frozen, FrozenError};
pub use instance::Instance;

/// Attribute access shared by classes, instances and their frozen forms.
pub trait Attributes {
    /// Resolves `name`, following instance, class, then base classes.
    fn get_attr(&self, name: &str) -> Option<&Value>;

    fn set_attr(&mut self, name: &str, value: Value) -> Result<(), AttributeError>;

    fn del_attr(&mut self, name: &str) -> Result<(), AttributeError>;

    fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }
}

/// A class-like value that can be bound, extended and instantiated.
pub trait ClassObject: Attributes + fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Every field visible on this class, inherited ones included.
    fn declared_fields(&self) -> Vec<FieldDescriptor>;

    /// Runs the class constructor with `args` and returns the new instance.
    fn instantiate(&self, args: &[Value]) -> Result<Box<dyn Object + '_>, AttributeError>;

    fn is_frozen(&self) -> bool {
        false
    }
}

/// An instance of a [`ClassObject`]; `Display` renders its representation.
pub trait Object: Attributes + fmt::Display + fmt::Debug {
    fn class_name(&self) -> &str;
}
