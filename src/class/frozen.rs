//! Immutability guard for classes and instances.
//!
//! [`freeze`] consumes a value and returns a wrapper that forwards every read
//! and rejects every write or delete with [`FrozenError`]. There is no way
//! back: the wrapper never hands out mutable access to what it guards.
//!
//! Freezing a [`Class`] also freezes each instance it creates, including
//! while its constructor runs. Classes derived from a frozen class are not
//! frozen unless they are passed through [`freeze`] themselves.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use super::{AttributeError, Attributes, Class, ClassObject, FieldDescriptor, Instance, Object};
use crate::convert::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("configuration is frozen, modifying attributes is not allowed")]
pub struct FrozenError;

/// A read-only view over `T`.
#[derive(Debug)]
pub struct Frozen<T> {
    inner: T,
}

/// Wraps `inner` so every write is rejected.
pub fn freeze<T: Attributes>(inner: T) -> Frozen<T> {
    Frozen { inner }
}

impl<T> Frozen<T> {
    /// Returns the wrapped value.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

impl<T: Attributes> Attributes for Frozen<T> {
    fn get_attr(&self, name: &str) -> Option<&Value> {
        self.inner.get_attr(name)
    }

    fn set_attr(&mut self, _name: &str, _value: Value) -> Result<(), AttributeError> {
        Err(FrozenError.into())
    }

    fn del_attr(&mut self, _name: &str) -> Result<(), AttributeError> {
        Err(FrozenError.into())
    }
}

impl ClassObject for Frozen<Class> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn declared_fields(&self) -> Vec<FieldDescriptor> {
        self.inner.declared_fields()
    }

    fn instantiate(&self, args: &[Value]) -> Result<Box<dyn Object + '_>, AttributeError> {
        let mut instance = freeze(Instance::new(&self.inner));
        self.inner.construct(&mut instance, args)?;
        Ok(Box::new(instance))
    }

    fn is_frozen(&self) -> bool {
        true
    }
}

impl From<Class> for Frozen<Class> {
    fn from(class: Class) -> Self {
        debug!(class = class.name(), "freezing class");
        freeze(class)
    }
}

impl Object for Frozen<Instance<'_>> {
    fn class_name(&self) -> &str {
        self.inner.class_name()
    }
}

impl<T: fmt::Display> fmt::Display for Frozen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::class::Constructor;

    fn sample_classes() -> [Class; 2] {
        [
            Class::new("EmptyClass"),
            Class::new("WithClassAttributes")
                .attr("bla", 42)
                .attr("blu", 0.42),
        ]
    }

    #[test]
    fn test_frozen_class_rejects_set_and_delete() {
        for class in sample_classes() {
            let mut frozen = freeze(class);

            let err = frozen.set_attr("bla", Value::Int(41)).unwrap_err();
            assert!(err.is_frozen());
            assert!(matches!(
                frozen.del_attr("bla"),
                Err(AttributeError::Frozen(FrozenError))
            ));
        }
    }

    #[test]
    fn test_frozen_instance_rejects_set_and_delete() {
        for class in sample_classes() {
            let frozen = Frozen::from(class);
            let mut instance = frozen.instantiate(&[]).unwrap();

            assert!(instance.set_attr("bla", Value::Int(41)).unwrap_err().is_frozen());
            assert!(instance.del_attr("blu").unwrap_err().is_frozen());
        }
    }

    #[test]
    fn test_reads_are_unchanged() {
        let base: Arc<dyn ClassObject> = Arc::new(Class::new("Base").attr("inherited", 1));
        let frozen = freeze(Class::new("Test").extends(base).attr("own", 2));

        assert_eq!(frozen.get_attr("own"), Some(&Value::Int(2)));
        assert_eq!(frozen.get_attr("inherited"), Some(&Value::Int(1)));
        assert_eq!(frozen.get_attr("missing"), None);
        assert!(frozen.is_frozen());
        assert_eq!(frozen.name(), "Test");

        let instance = frozen.instantiate(&[]).unwrap();
        assert_eq!(instance.get_attr("inherited"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_constructor_writing_attributes_fails_when_frozen() {
        let class = Class::new("WithInstanceAttributes").with_constructor(Constructor::new(
            0,
            |this, _| this.set_attr("bla", Value::Int(42)),
        ));

        let err = freeze(class).instantiate(&[]).unwrap_err();
        assert!(err.is_frozen());
    }

    #[test]
    fn test_error_message_is_fixed() {
        assert_eq!(
            AttributeError::from(FrozenError).to_string(),
            "configuration is frozen, modifying attributes is not allowed"
        );
    }

    #[test]
    fn test_subclass_of_frozen_class_is_mutable() {
        let base: Arc<dyn ClassObject> = Arc::new(freeze(Class::new("Base").attr("attr", 1)));
        let mut child = Class::new("Child").extends(base.clone());

        child.set_attr("attr", Value::Int(2)).unwrap();
        assert_eq!(child.get_attr("attr"), Some(&Value::Int(2)));
        assert_eq!(base.get_attr("attr"), Some(&Value::Int(1)));
        assert!(!child.is_frozen());

        let mut frozen_child = freeze(child);
        assert!(frozen_child.set_attr("attr", Value::Int(3)).is_err());
    }
}
