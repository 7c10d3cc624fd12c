//! Named input fields the coordinator reads from, and the output surface it
//! writes to.

use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::render::RenderedResults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    TotalNumbers,
    Choose,
    MinSum,
    MaxSum,
    MinEven,
    MaxEven,
    MinDistance,
    MaxDistance,
    IncludeNumbers,
    ExcludeNumbers,
    RandomCount,
    MaxConsecutive,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::TotalNumbers,
        Field::Choose,
        Field::MinSum,
        Field::MaxSum,
        Field::MinEven,
        Field::MaxEven,
        Field::MinDistance,
        Field::MaxDistance,
        Field::IncludeNumbers,
        Field::ExcludeNumbers,
        Field::RandomCount,
        Field::MaxConsecutive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::TotalNumbers => "total_numbers",
            Field::Choose => "choose",
            Field::MinSum => "min_sum",
            Field::MaxSum => "max_sum",
            Field::MinEven => "min_even",
            Field::MaxEven => "max_even",
            Field::MinDistance => "min_distance",
            Field::MaxDistance => "max_distance",
            Field::IncludeNumbers => "include_numbers",
            Field::ExcludeNumbers => "exclude_numbers",
            Field::RandomCount => "random_count",
            Field::MaxConsecutive => "max_consecutive",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownField(needle.to_string()))
    }
}

/// Source of raw, unvalidated field text.
pub trait FormSource {
    fn value(&self, field: Field) -> Option<String>;
}

/// Output regions: the combinations list, the total-count display, and a
/// blocking notification channel.
pub trait ResultsSurface {
    fn render(&self, results: &RenderedResults);
    fn set_total(&self, total: u64);
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: BTreeMap<Field, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn clear(&mut self, field: Field) -> Option<String> {
        self.values.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

impl FormSource for FormState {
    fn value(&self, field: Field) -> Option<String> {
        self.values.get(&field).cloned()
    }
}
