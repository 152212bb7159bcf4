use std::collections::BTreeSet;

use super::native::NativeKind;

/// Implicit conversions the resolver may insert when passing call arguments.
///
/// Only native-to-native widenings are expressible. Pointers, arrays and
/// classes never convert implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionTable {
    widenings: BTreeSet<(NativeKind, NativeKind)>,
    /// Integer literals convert to any integer type whose range holds them.
    literal_narrowing: bool,
}

impl ConversionTable {
    /// A table permitting nothing but exact matches.
    pub fn exact_only() -> Self {
        ConversionTable {
            widenings: BTreeSet::new(),
            literal_narrowing: false,
        }
    }

    pub fn allow(mut self, from: NativeKind, to: NativeKind) -> Self {
        self.widenings.insert((from, to));
        self
    }

    pub fn with_literal_narrowing(mut self, enabled: bool) -> Self {
        self.literal_narrowing = enabled;
        self
    }

    pub fn permits(&self, from: NativeKind, to: NativeKind) -> bool {
        self.widenings.contains(&(from, to))
    }

    pub fn permits_literal(&self, value: i64, to: NativeKind) -> bool {
        self.literal_narrowing && to.is_integer() && to.holds(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NativeKind, NativeKind)> {
        self.widenings.iter()
    }
}

impl Default for ConversionTable {
    fn default() -> Self {
        let sized = [NativeKind::Int8, NativeKind::Int16, NativeKind::Int32, NativeKind::Int64];

        let mut table = ConversionTable::exact_only().with_literal_narrowing(true);
        for (index, from) in sized.iter().enumerate() {
            for to in &sized[index + 1..] {
                table = table.allow(*from, *to);
            }
        }

        table
            .allow(NativeKind::Int8, NativeKind::Integer)
            .allow(NativeKind::Int16, NativeKind::Integer)
            .allow(NativeKind::Int32, NativeKind::Integer)
    }
}
