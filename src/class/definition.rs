use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::field::merge_fields;
use super::{AttributeError, Attributes, ClassObject, FieldDescriptor, Instance, Object};
use crate::convert::{TypeExpr, Value};

type ConstructorFn = dyn Fn(&mut dyn Attributes, &[Value]) -> Result<(), AttributeError> + Send + Sync;

/// The constructor run by [`ClassObject::instantiate`].
///
/// Its body receives the new instance and the call arguments. The default
/// constructor takes no arguments and assigns nothing.
#[derive(Clone)]
pub struct Constructor {
    arity: usize,
    body: Arc<ConstructorFn>,
}

impl Constructor {
    /// A constructor taking exactly `arity` arguments.
    pub fn new<F>(arity: usize, body: F) -> Self
    where
        F: Fn(&mut dyn Attributes, &[Value]) -> Result<(), AttributeError> + Send + Sync + 'static,
    {
        Self {
            arity,
            body: Arc::new(body),
        }
    }

    /// A constructor that takes no arguments and assigns nothing.
    pub fn empty() -> Self {
        Self::new(0, |_, _| Ok(()))
    }

    /// Returns the number of arguments the constructor takes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        &self,
        class: &str,
        target: &mut dyn Attributes,
        args: &[Value],
    ) -> Result<(), AttributeError> {
        if args.len() != self.arity {
            return Err(AttributeError::Arity {
                class: class.to_string(),
                expected: self.arity,
                given: args.len(),
            });
        }
        (self.body)(target, args)
    }
}

impl Default for Constructor {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A configuration class definition.
///
/// Declared fields are what the binder resolves; attributes are the values
/// the class currently holds. Declaring a field with a default also sets
/// the attribute, the same way a class body assignment would.
///
/// ```
/// use dragon_env::{Attributes, Class, TypeExpr, Value};
///
/// let class = Class::new("Server")
///     .field("HOST", TypeExpr::STR)
///     .field_with_default("PORT", "int", 8080);
///
/// assert_eq!(class.get_attr("PORT"), Some(&Value::Int(8080)));
/// assert!(!class.has_attr("HOST"));
/// ```
#[derive(Debug)]
pub struct Class {
    name: String,
    base: Option<Arc<dyn ClassObject>>,
    fields: Vec<FieldDescriptor>,
    attrs: BTreeMap<String, Value>,
    constructor: Constructor,
    repr_fields: Option<Vec<String>>,
}

impl Class {
    /// Starts a class with no fields and no base.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            fields: Vec::new(),
            attrs: BTreeMap::new(),
            constructor: Constructor::empty(),
            repr_fields: None,
        }
    }

    /// Derives this class from `base`, frozen or not.
    pub fn extends(mut self, base: Arc<dyn ClassObject>) -> Self {
        self.base = Some(base);
        self
    }

    /// Declares a field with no default.
    pub fn field(mut self, name: impl Into<String>, declared_type: impl Into<TypeExpr>) -> Self {
        self.fields.push(FieldDescriptor::new(name, declared_type));
        self
    }

    /// Declares a field and installs `default` as its class attribute.
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        declared_type: impl Into<TypeExpr>,
        default: impl Into<Value>,
    ) -> Self {
        let field = FieldDescriptor::new(name, declared_type).with_default(default);
        if let Some(default) = &field.default {
            self.attrs.insert(field.name.clone(), default.clone());
        }
        self.fields.push(field);
        self
    }

    /// Sets a plain class attribute that is not a declared field.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Sets the constructor run on instantiation.
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = constructor;
        self
    }

    /// Returns the base class, if any.
    pub fn base(&self) -> Option<&Arc<dyn ClassObject>> {
        self.base.as_ref()
    }

    /// Returns the constructor.
    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    /// Fields listed by the generated representation, if one was installed.
    pub fn repr_fields(&self) -> Option<&[String]> {
        self.repr_fields.as_deref()
    }

    /// Writes straight into this class's own attributes. Base classes are
    /// never touched, so a frozen base does not get in the way.
    pub(crate) fn install(&mut self, name: String, value: Value) {
        self.attrs.insert(name, value);
    }

    pub(crate) fn set_constructor(&mut self, constructor: Constructor) {
        self.constructor = constructor;
    }

    pub(crate) fn set_repr_fields(&mut self, fields: Vec<String>) {
        self.repr_fields = Some(fields);
    }

    pub(crate) fn construct(
        &self,
        target: &mut dyn Attributes,
        args: &[Value],
    ) -> Result<(), AttributeError> {
        self.constructor.call(&self.name, target, args)
    }
}

impl Attributes for Class {
    fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attrs
            .get(name)
            .or_else(|| self.base.as_deref().and_then(|base| base.get_attr(name)))
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
                owner: self.name.clone(),
                name: name.to_string(),
            })
    }
}

impl ClassObject for Class {
    fn name(&self) -> &str {
        &self.name
    }

    /// Inherited fields come first, then new declarations. A field without
    /// a declared default falls back to the attribute of the same name, so
    /// values bound on a base class carry over.
    fn declared_fields(&self) -> Vec<FieldDescriptor> {
        let inherited = self
            .base
            .as_deref()
            .map(|base| base.declared_fields())
            .unwrap_or_default();

        let mut fields = merge_fields(inherited, &self.fields);
        for field in &mut fields {
            if field.default.is_none() {
                field.default = self.get_attr(&field.name).filter(|v| !v.is_none()).cloned();
            }
        }
        fields
    }

    fn instantiate(&self, args: &[Value]) -> Result<Box<dyn Object + '_>, AttributeError> {
        let mut instance = Instance::new(self);
        self.construct(&mut instance, args)?;
        Ok(Box::new(instance))
    }
}
