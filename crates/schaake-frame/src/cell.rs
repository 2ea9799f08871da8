use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single typed table value.
///
/// Cells are totally ordered (first by variant, then by value) and hashable,
/// so any combination of cells can key a group. Floats compare with
/// [`f64::total_cmp`].
///
/// In JSON, `null`, booleans, integers, floats, and strings map to the
/// matching variant. Date cells serialize as ISO-8601 strings; they are only
/// produced from strings on request (see [`Cell::parse_date`]), because a
/// JSON string is always read back as [`Cell::Str`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, derive_more::Display, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    #[display("null")]
    Null,
    #[display("{_0}")]
    Bool(bool),
    #[display("{_0}")]
    Int(i64),
    #[display("{_0}")]
    Float(f64),
    #[display("{_0}")]
    Str(String),
    #[display("{_0}")]
    Date(NaiveDate),
    #[display("{_0}")]
    DateTime(NaiveDateTime),
}

impl Cell {
    fn rank(&self) -> u8 {
        match self {
            Cell::Null => 0,
            Cell::Bool(_) => 1,
            Cell::Int(_) => 2,
            Cell::Float(_) => 3,
            Cell::Str(_) => 4,
            Cell::Date(_) => 5,
            Cell::DateTime(_) => 6,
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Bool(_) => "bool",
            Cell::Int(_) => "integer",
            Cell::Float(_) => "float",
            Cell::Str(_) => "string",
            Cell::Date(_) => "date",
            Cell::DateTime(_) => "datetime",
        }
    }

    /// Returns the numeric value of an `Int` or `Float` cell.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value of an `Int` cell.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Converts an ISO-8601 string cell into a `Date` or `DateTime` cell.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD HH:MM:SS`
    /// (optionally with fractional seconds). Other cells are returned
    /// unchanged; strings that do not parse yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use schaake_frame::Cell;
    ///
    /// let cell = Cell::from("2020-01-15").parse_date().unwrap();
    /// assert_eq!(cell, Cell::Date(NaiveDate::from_ymd_opt(2020, 1, 15).unwrap()));
    /// assert_eq!(Cell::Int(3).parse_date(), Some(Cell::Int(3)));
    /// assert_eq!(Cell::from("soon").parse_date(), None);
    /// ```
    #[must_use]
    pub fn parse_date(self) -> Option<Cell> {
        let Cell::Str(s) = &self else {
            return Some(self);
        };
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(Cell::Date(date));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(Cell::DateTime)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cell::Null, Cell::Null) => Ordering::Equal,
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Float(a), Cell::Float(b)) => a.total_cmp(b),
            (Cell::Str(a), Cell::Str(b)) => a.cmp(b),
            (Cell::Date(a), Cell::Date(b)) => a.cmp(b),
            (Cell::DateTime(a), Cell::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Cell::Null => {}
            Cell::Bool(v) => v.hash(state),
            Cell::Int(v) => v.hash(state),
            Cell::Float(v) => v.to_bits().hash(state),
            Cell::Str(v) => v.hash(state),
            Cell::Date(v) => v.hash(state),
            Cell::DateTime(v) => v.hash(state),
        }
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Int(i64::from(value))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Str(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Str(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::DateTime(value)
    }
}

impl<T> From<Option<T>> for Cell
where
    T: Into<Cell>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_json_mapping() {
        let cells: Vec<Cell> = serde_json::from_str(r#"[null, true, 3, 2.5, "a", 4.0]"#).unwrap();
        assert_eq!(
            cells,
            [
                Cell::Null,
                Cell::Bool(true),
                Cell::Int(3),
                Cell::Float(2.5),
                Cell::from("a"),
                Cell::Float(4.0),
            ]
        );
    }

    #[test]
    fn test_date_serializes_as_iso_string() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
        assert_eq!(serde_json::to_string(&Cell::Date(date)).unwrap(), r#""2020-01-15""#);
        assert_eq!(serde_json::to_string(&Cell::Null).unwrap(), "null");
    }

    #[test]
    fn test_ordering_within_and_across_variants() {
        assert!(Cell::Int(1) < Cell::Int(2));
        assert!(Cell::Float(-0.5) < Cell::Float(0.5));
        assert!(Cell::Null < Cell::Int(0));
        assert!(Cell::Int(100) < Cell::Float(0.0));
        assert!(Cell::from("a") < Cell::from("b"));
        assert_ne!(Cell::Int(1), Cell::Float(1.0));
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let set = HashSet::from([Cell::Float(1.5), Cell::Float(1.5), Cell::from("x"), Cell::Null]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_parse_datetime() {
        let cell = Cell::from("2020-01-15T06:30:00").parse_date().unwrap();
        assert!(cell.is_date_time());
        assert_eq!(cell.to_string(), "2020-01-15 06:30:00");
    }
}
