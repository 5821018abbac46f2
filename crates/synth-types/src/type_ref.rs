//! Parameter and return type references.
//!
//! Signature matching compares [`TypeRef`]s with `==`: exact identity, no
//! variance and no assignability. The display and parse forms use the
//! C#-style short spelling (`int`, `string[]`, `int[,]`, `long?`,
//! `(int, string)`) so manifests and CLI output read naturally.

use std::fmt;

use crate::registry::TypeId;

/// Built-in types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Void,
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    Object,
}

impl Primitive {
    pub fn keyword(&self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::String => "string",
            Primitive::Object => "object",
        }
    }

    /// Accepts the keyword and the framework spelling (`Int32`, `System.Int32`).
    pub fn from_keyword(s: &str) -> Option<Self> {
        let s = s.strip_prefix("System.").unwrap_or(s);
        let prim = match s {
            "void" | "Void" => Primitive::Void,
            "bool" | "Boolean" => Primitive::Bool,
            "int" | "Int32" => Primitive::Int,
            "long" | "Int64" => Primitive::Long,
            "float" | "Single" => Primitive::Float,
            "double" | "Double" => Primitive::Double,
            "string" | "String" => Primitive::String,
            "object" | "Object" => Primitive::Object,
            _ => return None,
        };
        Some(prim)
    }
}

/// A reference to a type as it appears in a method signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    /// A registered class or interface.
    Named(TypeId),
    /// Array with `rank` dimensions (`T[]` is rank 1, `T[,]` rank 2).
    Array { element: Box<TypeRef>, rank: u8 },
    Nullable(Box<TypeRef>),
    Tuple(Vec<TypeRef>),
}

impl TypeRef {
    pub const VOID: TypeRef = TypeRef::Primitive(Primitive::Void);
    pub const BOOL: TypeRef = TypeRef::Primitive(Primitive::Bool);
    pub const INT: TypeRef = TypeRef::Primitive(Primitive::Int);
    pub const LONG: TypeRef = TypeRef::Primitive(Primitive::Long);
    pub const FLOAT: TypeRef = TypeRef::Primitive(Primitive::Float);
    pub const DOUBLE: TypeRef = TypeRef::Primitive(Primitive::Double);
    pub const STRING: TypeRef = TypeRef::Primitive(Primitive::String);
    pub const OBJECT: TypeRef = TypeRef::Primitive(Primitive::Object);

    pub fn named(id: TypeId) -> Self {
        TypeRef::Named(id)
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    pub fn array_of_rank(element: TypeRef, rank: u8) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: rank.max(1),
        }
    }

    pub fn nullable(inner: TypeRef) -> Self {
        TypeRef::Nullable(Box::new(inner))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(Primitive::Void))
    }

    /// Short display name, resolving named types through `name_of`.
    ///
    /// Named types print their simple name (the part after the last `.`);
    /// unresolvable ids fall back to `#<id>`.
    pub fn simple_name<F>(&self, name_of: &F) -> String
    where
        F: Fn(TypeId) -> Option<String>,
    {
        match self {
            TypeRef::Primitive(p) => p.keyword().to_string(),
            TypeRef::Named(id) => match name_of(*id) {
                Some(full) => match full.rfind('.') {
                    Some(pos) if pos + 1 < full.len() => full[pos + 1..].to_string(),
                    _ => full,
                },
                None => format!("#{}", id.index()),
            },
            TypeRef::Array { element, rank } => {
                let commas = ",".repeat(usize::from(rank.saturating_sub(1)));
                format!("{}[{}]", element.simple_name(name_of), commas)
            }
            TypeRef::Nullable(inner) => format!("{}?", inner.simple_name(name_of)),
            TypeRef::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(|t| t.simple_name(name_of)).collect();
                format!("({})", parts.join(", "))
            }
        }
    }
}

impl From<Primitive> for TypeRef {
    fn from(p: Primitive) -> Self {
        TypeRef::Primitive(p)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let no_names = |_: TypeId| -> Option<String> { None };
        f.write_str(&self.simple_name(&no_names))
    }
}

/// Format a parameter list as `int, string[]`.
pub fn format_params<F>(params: &[TypeRef], name_of: &F) -> String
where
    F: Fn(TypeId) -> Option<String>,
{
    params
        .iter()
        .map(|p| p.simple_name(name_of))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a type reference, resolving non-primitive names through `resolve`.
///
/// Supports primitives, named types (full names), `T[]`/`T[,]` arrays,
/// `T?` nullables and `(A, B)` tuples, nested arbitrarily.
pub fn parse_type_ref<F>(type_str: &str, resolve: &F) -> Option<TypeRef>
where
    F: Fn(&str) -> Option<TypeId>,
{
    let type_str = type_str.trim();
    if type_str.is_empty() {
        return None;
    }

    if let Some(inner) = type_str.strip_suffix('?') {
        return Some(TypeRef::nullable(parse_type_ref(inner, resolve)?));
    }

    if type_str.ends_with(']') {
        let open = type_str.rfind('[')?;
        let dims = &type_str[open + 1..type_str.len() - 1];
        if !dims.chars().all(|c| c == ',') {
            return None;
        }
        let rank = u8::try_from(dims.len() + 1).ok()?;
        let element = parse_type_ref(&type_str[..open], resolve)?;
        return Some(TypeRef::array_of_rank(element, rank));
    }

    if let Some(inner) = type_str
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        let items = split_type_list(inner)
            .into_iter()
            .map(|item| parse_type_ref(item, resolve))
            .collect::<Option<Vec<_>>>()?;
        if items.len() < 2 {
            return None;
        }
        return Some(TypeRef::Tuple(items));
    }

    if let Some(prim) = Primitive::from_keyword(type_str) {
        return Some(TypeRef::Primitive(prim));
    }

    resolve(type_str).map(TypeRef::Named)
}

/// Split a comma-separated type list, respecting nested brackets.
///
/// `"int, (int, string), bool[,]"` gives `["int", "(int, string)", "bool[,]"]`.
pub fn split_type_list(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' | '<' => depth += 1,
            ')' | ']' | '>' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < s.len() && !s[start..].trim().is_empty() {
        result.push(s[start..].trim());
    }

    result
}
