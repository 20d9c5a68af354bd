//! Declared field types.
//!
//! A [`TypeExpr`] is what a field descriptor says a field should become.
//! Besides the constructors, type expressions can be parsed from annotation
//! text such as `List[int]` or `Optional[str]`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Scalar target types with a built-in converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Str,
    Int,
    Float,
    Bool,
}

impl Primitive {
    /// The builtin name, e.g. `int`.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Str => "str",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" => Some(Primitive::Str),
            "int" => Some(Primitive::Int),
            "float" => Some(Primitive::Float),
            "bool" => Some(Primitive::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The declared type of a configuration field.
///
/// `Optional(Optional(T))` never occurs when values are built through
/// [`TypeExpr::optional`] or parsed: nested optionals collapse to one level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Primitive(Primitive),
    /// Comma separated list. `None` means an untyped list of strings.
    List(Option<Box<TypeExpr>>),
    /// Free-form structured data (JSON object, array or scalar).
    Dict,
    Optional(Box<TypeExpr>),
    /// Any type without a built-in converter, kept by name so custom
    /// converters can claim it.
    Other(String),
}

impl TypeExpr {
    pub const STR: TypeExpr = TypeExpr::Primitive(Primitive::Str);
    pub const INT: TypeExpr = TypeExpr::Primitive(Primitive::Int);
    pub const FLOAT: TypeExpr = TypeExpr::Primitive(Primitive::Float);
    pub const BOOL: TypeExpr = TypeExpr::Primitive(Primitive::Bool);
    pub const LIST: TypeExpr = TypeExpr::List(None);

    /// A list whose elements convert as `element`.
    pub fn list_of(element: impl Into<TypeExpr>) -> Self {
        TypeExpr::List(Some(Box::new(element.into())))
    }

    /// Wraps `inner` as optional, collapsing an already optional type.
    pub fn optional(inner: impl Into<TypeExpr>) -> Self {
        match inner.into() {
            optional @ TypeExpr::Optional(_) => optional,
            other => TypeExpr::Optional(Box::new(other)),
        }
    }

    /// A type no built-in converter handles.
    pub fn other(name: impl Into<String>) -> Self {
        TypeExpr::Other(name.into())
    }

    /// Whether the field may be absent.
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeExpr::Optional(_))
    }

    /// Whether this is a list, typed or not.
    pub fn is_list(&self) -> bool {
        matches!(self, TypeExpr::List(_))
    }

    /// Whether this is a structured dict.
    pub fn is_dict(&self) -> bool {
        matches!(self, TypeExpr::Dict)
    }

    /// Strips every optional layer.
    pub fn unwrap_optional(&self) -> &TypeExpr {
        match self {
            TypeExpr::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    /// Parses annotation text. Unknown spellings become [`TypeExpr::Other`].
    pub fn parse(text: &str) -> Self {
        parse_expr(text.trim())
    }
}

impl From<Primitive> for TypeExpr {
    fn from(primitive: Primitive) -> Self {
        TypeExpr::Primitive(primitive)
    }
}

impl From<&str> for TypeExpr {
    fn from(text: &str) -> Self {
        TypeExpr::parse(text)
    }
}

impl FromStr for TypeExpr {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TypeExpr::parse(s))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive(primitive) => write!(f, "{primitive}"),
            TypeExpr::List(None) => f.write_str("list"),
            TypeExpr::List(Some(element)) => write!(f, "list[{element}]"),
            TypeExpr::Dict => f.write_str("dict"),
            TypeExpr::Optional(inner) => write!(f, "Optional[{inner}]"),
            TypeExpr::Other(name) => f.write_str(name),
        }
    }
}

fn parse_expr(text: &str) -> TypeExpr {
    let members = split_top_level(text, '|');
    if members.len() > 1 {
        return parse_union(text, &members);
    }

    let (head, args) = match text.find('[') {
        Some(open) if text.ends_with(']') => {
            (text[..open].trim(), Some(&text[open + 1..text.len() - 1]))
        }
        Some(_) => return TypeExpr::other(text),
        None => (text, None),
    };

    if let (Some(primitive), None) = (Primitive::from_name(head), args) {
        return primitive.into();
    }

    match (head, args) {
        ("list" | "List", None) => TypeExpr::LIST,
        ("list" | "List", Some(args)) => TypeExpr::list_of(parse_expr(args.trim())),
        ("dict" | "Dict", None) => TypeExpr::Dict,
        ("Optional", Some(args)) => TypeExpr::optional(parse_expr(args.trim())),
        ("Union", Some(args)) => parse_union(text, &split_top_level(args, ',')),
        _ => TypeExpr::other(text),
    }
}

/// A union with a `None` member is optional over its first other member.
fn parse_union(text: &str, members: &[&str]) -> TypeExpr {
    let mut optional = false;
    let mut rest = Vec::new();

    for member in members {
        let member = member.trim();
        if member == "None" || member == "NoneType" {
            optional = true;
            continue;
        }
        match parse_expr(member) {
            TypeExpr::Optional(inner) => {
                optional = true;
                rest.push(*inner);
            }
            other => rest.push(other),
        }
    }

    let mut rest = rest.into_iter();
    match (optional, rest.next(), rest.next()) {
        (true, Some(first), _) => TypeExpr::optional(first),
        (false, Some(only), None) => only,
        _ => TypeExpr::other(text),
    }
}

fn split_top_level(text: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in text.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == delimiter && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
