use std::collections::BTreeMap;
use std::fmt;

use super::{AttributeError, Attributes, Class, ClassObject, Object};
use crate::convert::Value;

/// An instance of a [`Class`].
///
/// Reads look in the instance's own attributes first, then the class and
/// its bases. Writes and deletes only ever touch the instance.
#[derive(Debug)]
pub struct Instance<'c> {
    class: &'c Class,
    attrs: BTreeMap<String, Value>,
}

impl<'c> Instance<'c> {
    pub(crate) fn new(class: &'c Class) -> Self {
        Self {
            class,
            attrs: BTreeMap::new(),
        }
    }

    /// Returns the class this instance was created from.
    pub fn class(&self) -> &'c Class {
        self.class
    }
}

impl Attributes for Instance<'_> {
    fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attrs
            .get(name)
            .or_else(|| self.class.get_attr(name))
    }

    fn set_attr(&mut self, name: &str, value: Value) -> Result<(), AttributeError> {
        self.attrs.insert(name.to_string(), value);
        Ok(())
    }

    fn del_attr(&mut self, name: &str) -> Result<(), AttributeError> {
        self.attrs
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AttributeError::NotFound {
                owner: self.class.name().to_string(),
                name: name.to_string(),
            })
    }
}

impl Object for Instance<'_> {
    fn class_name(&self) -> &str {
        self.class.name()
    }
}

/// `Name(a=1,b=2)` when the class has a generated representation, listing
/// only fields the instance can still resolve.
impl fmt::Display for Instance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(fields) = self.class.repr_fields() else {
            return write!(f, "<{} object>", self.class.name());
        };

        write!(f, "{}(", self.class.name())?;
        let present = fields
            .iter()
            .filter_map(|name| self.get_attr(name).map(|value| (name, value)));
        for (index, (name, value)) in present.enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}
