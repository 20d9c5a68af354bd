use crate::convert::{TypeExpr, Value};

/// One declared field of a configuration class.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: TypeExpr,
    /// Already typed; used as-is when the source has no value.
    pub default: Option<Value>,
}

impl FieldDescriptor {
    /// A required field of `declared_type`.
    pub fn new(name: impl Into<String>, declared_type: impl Into<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            default: None,
        }
    }

    /// Sets the value used when the source has no entry.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether the declared type is optional.
    pub fn is_optional(&self) -> bool {
        self.declared_type.is_optional()
    }
}

/// Overlays `declared` onto `inherited`.
///
/// A redeclared name replaces the inherited descriptor in its original
/// position; new names are appended in declaration order.
pub(crate) fn merge_fields(
    mut inherited: Vec<FieldDescriptor>,
    declared: &[FieldDescriptor],
) -> Vec<FieldDescriptor> {
    for field in declared {
        match inherited.iter_mut().find(|f| f.name == field.name) {
            Some(slot) => *slot = field.clone(),
            None => inherited.push(field.clone()),
        }
    }
    inherited
}
