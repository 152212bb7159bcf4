use std::{collections::BTreeMap, fmt::Display};

/// Binary operators on integer types returning the operand type.
pub const ARITHMETIC_OPERATORS: [&str; 5] = ["+", "-", "*", "/", "%"];
/// Binary operators on integer types returning `Boolean`.
pub const COMPARISON_OPERATORS: [&str; 6] = ["<", "<=", ">", ">=", "==", "!="];
/// Binary operators on `Boolean`.
pub const LOGICAL_OPERATORS: [&str; 4] = ["and", "or", "==", "!="];
pub const NEGATE_OPERATOR: &str = "-";
pub const NOT_OPERATOR: &str = "not";

/// The built-in types every compilation unit knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NativeKind {
    Void,
    Boolean,
    /// The language's own 64-bit integer.
    Integer,
    Int8,
    Int16,
    Int32,
    Int64,
}

impl NativeKind {
    pub const ALL: [NativeKind; 7] = [
        NativeKind::Void,
        NativeKind::Boolean,
        NativeKind::Integer,
        NativeKind::Int8,
        NativeKind::Int16,
        NativeKind::Int32,
        NativeKind::Int64,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NativeKind::Void => "Void",
            NativeKind::Boolean => "Boolean",
            NativeKind::Integer => "Integer",
            NativeKind::Int8 => "Int8",
            NativeKind::Int16 => "Int16",
            NativeKind::Int32 => "Int32",
            NativeKind::Int64 => "Int64",
        }
    }

    pub fn is_integer(&self) -> bool {
        self.bit_width().is_some()
    }

    pub fn bit_width(&self) -> Option<u32> {
        match self {
            NativeKind::Void | NativeKind::Boolean => None,
            NativeKind::Int8 => Some(8),
            NativeKind::Int16 => Some(16),
            NativeKind::Int32 => Some(32),
            NativeKind::Integer | NativeKind::Int64 => Some(64),
        }
    }

    /// Whether `value` is representable in this integer type.
    pub fn holds(&self, value: i64) -> bool {
        match self.bit_width() {
            Some(64) => true,
            Some(bits) => {
                let max = (1i64 << (bits - 1)) - 1;
                let min = -(1i64 << (bits - 1));
                value >= min && value <= max
            },
            _ => false,
        }
    }

    /// The single-letter encoding used in mangled names.
    pub fn mangle_tag(&self) -> char {
        match self {
            NativeKind::Void => 'v',
            NativeKind::Boolean => 'b',
            NativeKind::Integer => 'i',
            NativeKind::Int8 => 'a',
            NativeKind::Int16 => 's',
            NativeKind::Int32 => 'l',
            NativeKind::Int64 => 'x',
        }
    }
}

impl Display for NativeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Source names under which native types can be referred to.
///
/// Built once per compilation unit and handed to the registry; nothing about
/// the set of natives is global.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTypeCatalog {
    names: BTreeMap<String, NativeKind>,
}

impl NativeTypeCatalog {
    /// A catalog with no names at all.
    pub fn empty() -> Self {
        NativeTypeCatalog { names: BTreeMap::new() }
    }

    pub fn with(mut self, name: impl Into<String>, kind: NativeKind) -> Self {
        self.names.insert(name.into(), kind);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<NativeKind> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NativeKind)> {
        self.names.iter().map(|(name, kind)| (name.as_str(), *kind))
    }
}

impl Default for NativeTypeCatalog {
    fn default() -> Self {
        NativeKind::ALL
            .iter()
            .fold(NativeTypeCatalog::empty(), |catalog, kind| catalog.with(kind.name(), *kind))
    }
}
