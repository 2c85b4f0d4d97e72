//! Hashable, totally ordered view of a single cell.
//!
//! Polars `AnyValue` is neither `Hash` nor `Ord` for every variant, so row
//! identity (deduplication) and row ordering (sorting) go through [`CellKey`].

use std::cmp::Ordering;

use polars::prelude::AnyValue;

/// Owned key for one cell value.
///
/// Floats are stored as normalized bits: `-0.0` equals `0.0` and every NaN
/// payload collapses to one canonical NaN. Nulls compare equal to each other
/// and sort before every non-null value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    Str(String),
}

impl CellKey {
    /// Builds a float key with normalized zero and NaN.
    pub fn float(value: f64) -> Self {
        let normalized = if value == 0.0 {
            0.0
        } else if value.is_nan() {
            f64::NAN
        } else {
            value
        };
        Self::Float(normalized.to_bits())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::UInt(_) | Self::Float(_) => 2,
            Self::Str(_) => 3,
        }
    }
}

impl From<AnyValue<'_>> for CellKey {
    fn from(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Null,
            AnyValue::Boolean(b) => Self::Bool(b),
            AnyValue::Int8(v) => Self::Int(i64::from(v)),
            AnyValue::Int16(v) => Self::Int(i64::from(v)),
            AnyValue::Int32(v) => Self::Int(i64::from(v)),
            AnyValue::Int64(v) => Self::Int(v),
            AnyValue::UInt8(v) => Self::Int(i64::from(v)),
            AnyValue::UInt16(v) => Self::Int(i64::from(v)),
            AnyValue::UInt32(v) => Self::Int(i64::from(v)),
            AnyValue::UInt64(v) => match i64::try_from(v) {
                Ok(v) => Self::Int(v),
                Err(_) => Self::UInt(v),
            },
            AnyValue::Float32(v) => Self::float(f64::from(v)),
            AnyValue::Float64(v) => Self::float(v),
            AnyValue::String(s) => Self::Str(s.to_string()),
            AnyValue::StringOwned(s) => Self::Str(s.to_string()),
            other => Self::Str(other.to_string()),
        }
    }
}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::UInt(a), Self::UInt(b)) => a.cmp(b),
            // UInt only holds values above i64::MAX
            (Self::Int(_), Self::UInt(_)) => Ordering::Less,
            (Self::UInt(_), Self::Int(_)) => Ordering::Greater,
            (Self::Float(a), Self::Float(b)) => f64::from_bits(*a).total_cmp(&f64::from_bits(*b)),
            (Self::Float(a), Self::Int(b)) => f64::from_bits(*a)
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            (Self::Int(a), Self::Float(b)) => (*a as f64)
                .total_cmp(&f64::from_bits(*b))
                .then(Ordering::Less),
            (Self::Float(a), Self::UInt(b)) => f64::from_bits(*a)
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            (Self::UInt(a), Self::Float(b)) => (*a as f64)
                .total_cmp(&f64::from_bits(*b))
                .then(Ordering::Less),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_zero_are_equal() {
        assert_eq!(CellKey::float(0.0), CellKey::float(-0.0));
        assert_eq!(CellKey::float(f64::NAN), CellKey::float(-f64::NAN));
    }

    #[test]
    fn nulls_sort_first() {
        let mut keys = vec![
            CellKey::Int(3),
            CellKey::Null,
            CellKey::Int(-1),
            CellKey::Null,
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![CellKey::Null, CellKey::Null, CellKey::Int(-1), CellKey::Int(3)]
        );
    }

    #[test]
    fn floats_order_by_value() {
        assert!(CellKey::float(-2.5) < CellKey::float(1.0));
        assert!(CellKey::float(1.0) < CellKey::float(f64::INFINITY));
    }

    #[test]
    fn from_any_value() {
        assert_eq!(CellKey::from(AnyValue::Int32(7)), CellKey::Int(7));
        assert_eq!(CellKey::from(AnyValue::String("a")), CellKey::Str("a".into()));
        assert_eq!(CellKey::from(AnyValue::Null), CellKey::Null);
        assert_eq!(CellKey::from(AnyValue::UInt64(u64::MAX)), CellKey::UInt(u64::MAX));
    }
}
