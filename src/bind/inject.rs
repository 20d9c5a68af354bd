use tracing::debug;

use super::{resolve_field, BindError, BindOptions};
use crate::class::{Class, ClassObject, Constructor, Frozen};
use crate::convert::ConverterRegistry;
use crate::source::Source;

/// A bound configuration class, frozen or not depending on [`BindOptions`].
pub type BoundClass = Box<dyn ClassObject>;

/// Resolves every declared field of `class` and installs the values as
/// class attributes.
///
/// All fields are resolved before anything is written, so a failing field
/// leaves no half-bound class behind: `class` is consumed either way.
pub fn inject(
    mut class: Class,
    prefix: &str,
    source: &dyn Source,
    converters: &ConverterRegistry,
    options: BindOptions,
) -> Result<BoundClass, BindError> {
    let fields = class.declared_fields();
    let values = fields
        .iter()
        .map(|field| {
            resolve_field(field, prefix, source, converters).map(|value| (field.name.clone(), value))
        })
        .collect::<Result<Vec<_>, BindError>>()?;

    if options.override_init {
        class.set_constructor(Constructor::empty());
    }
    if options.override_repr {
        class.set_repr_fields(fields.iter().map(|f| f.name.clone()).collect());
    }
    for (name, value) in values {
        class.install(name, value);
    }

    debug!(
        class = class.name(),
        fields = fields.len(),
        prefix,
        frozen = options.frozen,
        "bound configuration class"
    );

    if options.frozen {
        Ok(Box::new(Frozen::from(class)))
    } else {
        Ok(Box::new(class))
    }
}
