use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// One selected subset of the number pool, in the order the server sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Combination(pub Vec<i64>);

impl Combination {
    pub fn numbers(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> i64 {
        self.0.iter().fold(0i64, |acc, n| acc.saturating_add(*n))
    }

    pub fn even_count(&self) -> usize {
        self.0.iter().filter(|n| *n % 2 == 0).count()
    }
}

impl From<Vec<i64>> for Combination {
    fn from(value: Vec<i64>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, n) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Sum,
    EvenOdd,
    Distance,
    Include,
    Exclude,
    Random,
    Consecutive,
}

impl FilterKind {
    pub const ALL: [FilterKind; 7] = [
        FilterKind::Sum,
        FilterKind::EvenOdd,
        FilterKind::Distance,
        FilterKind::Include,
        FilterKind::Exclude,
        FilterKind::Random,
        FilterKind::Consecutive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Sum => "sum",
            FilterKind::EvenOdd => "even_odd",
            FilterKind::Distance => "distance",
            FilterKind::Include => "include",
            FilterKind::Exclude => "exclude",
            FilterKind::Random => "random",
            FilterKind::Consecutive => "consecutive",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ProtocolError::UnknownFilterKind(needle.to_string()))
    }
}
