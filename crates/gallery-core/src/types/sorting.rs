//! Sorting types for gallery listings.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Orient an ascending comparison result for this direction.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Unknown sort direction: {other}")),
        }
    }
}

/// Field a gallery file listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Upload date.
    #[default]
    Date,
    /// File name.
    Name,
    /// File size.
    Size,
    /// View count.
    Views,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Name => write!(f, "name"),
            Self::Size => write!(f, "size"),
            Self::Views => write!(f, "views"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            "size" => Ok(Self::Size),
            "views" => Ok(Self::Views),
            other => Err(format!("Unknown sort key: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_reverses() {
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("VIEWS".parse::<SortKey>(), Ok(SortKey::Views));
        assert_eq!("Asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
