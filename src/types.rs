//! Readout type flags
//!
//! A readout request names the categories of values it wants as a set of
//! flags. Historical values can additionally be narrowed down to the
//! granularities the node stores them at.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Sub};

use serde::{Deserialize, Serialize};

/// A set of requested readout categories
///
/// # Example
///
/// ```rust
/// use sensor_readout::ReadoutTypeSet;
///
/// let types = ReadoutTypeSet::HISTORICAL_VALUES | ReadoutTypeSet::HISTORICAL_VALUES_HOUR;
/// assert!(types.contains(ReadoutTypeSet::HISTORICAL_VALUES_HOUR));
/// assert!(!types.contains(ReadoutTypeSet::MOMENTARY_VALUES));
/// assert_eq!(types.to_string(), "historical|historicalHour");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct ReadoutTypeSet(u32);

impl ReadoutTypeSet {
    /// Nothing requested
    pub const EMPTY: Self = Self(0);
    /// Current values
    pub const MOMENTARY_VALUES: Self = Self(1 << 0);
    /// Minimum and maximum values
    pub const PEAK_VALUES: Self = Self(1 << 1);
    /// Device status and error states
    pub const STATUS_VALUES: Self = Self(1 << 2);
    /// Values calculated from other values
    pub const COMPUTED: Self = Self(1 << 3);
    /// Serial numbers, model names and similar identity data
    pub const IDENTITY: Self = Self(1 << 4);
    /// Historical values of any granularity
    pub const HISTORICAL_VALUES: Self = Self(1 << 5);
    pub const HISTORICAL_VALUES_SECOND: Self = Self(1 << 6);
    pub const HISTORICAL_VALUES_MINUTE: Self = Self(1 << 7);
    pub const HISTORICAL_VALUES_HOUR: Self = Self(1 << 8);
    pub const HISTORICAL_VALUES_DAY: Self = Self(1 << 9);
    pub const HISTORICAL_VALUES_WEEK: Self = Self(1 << 10);
    pub const HISTORICAL_VALUES_MONTH: Self = Self(1 << 11);
    pub const HISTORICAL_VALUES_QUARTER: Self = Self(1 << 12);
    pub const HISTORICAL_VALUES_YEAR: Self = Self(1 << 13);
    /// Historical values stored at an irregular interval
    pub const HISTORICAL_VALUES_OTHER: Self = Self(1 << 14);
    /// Every category and granularity
    pub const ALL: Self = Self((1 << 15) - 1);

    /// An empty set
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// The set of every flag
    pub const fn all() -> Self {
        Self::ALL
    }

    /// Raw bit representation
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build a set from raw bits, dropping bits that name no flag
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn is_all(self) -> bool {
        self.0 == Self::ALL.0
    }

    /// Whether every flag in `other` is also in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether `self` and `other` share at least one flag
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Insert `other` when `value` is true, remove it otherwise
    pub fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// The single flags contained in this set, in bit order
    pub fn iter(self) -> impl Iterator<Item = Self> {
        TYPE_FLAGS
            .iter()
            .map(|flag| flag.flag)
            .filter(move |flag| self.contains(*flag))
    }
}

impl Default for ReadoutTypeSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for ReadoutTypeSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ReadoutTypeSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ReadoutTypeSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for ReadoutTypeSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Sub for ReadoutTypeSet {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

impl Not for ReadoutTypeSet {
    type Output = Self;

    fn not(self) -> Self {
        Self::from_bits_truncate(!self.0)
    }
}

impl From<u32> for ReadoutTypeSet {
    fn from(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl From<ReadoutTypeSet> for u32 {
    fn from(types: ReadoutTypeSet) -> Self {
        types.0
    }
}

impl FromIterator<ReadoutTypeSet> for ReadoutTypeSet {
    fn from_iter<I: IntoIterator<Item = ReadoutTypeSet>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |acc, flag| acc | flag)
    }
}

impl fmt::Display for ReadoutTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        if self.is_all() {
            return f.write_str("all");
        }

        let mut first = true;
        for flag in TYPE_FLAGS.iter().filter(|flag| self.contains(flag.flag)) {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(flag.xml_attribute)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for ReadoutTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReadoutTypeSet({})", self)
    }
}

/// How a single readout flag is spelled by each transport
#[derive(Debug, Clone, Copy)]
pub struct TypeFlag {
    pub flag: ReadoutTypeSet,
    /// Key in an HTTP or CoAP query, matched after lower-casing
    pub query_key: &'static str,
    /// Attribute on an XML request element, matched case-sensitively
    pub xml_attribute: &'static str,
}

/// Every readout flag in bit order
pub static TYPE_FLAGS: [TypeFlag; 15] = [
    TypeFlag {
        flag: ReadoutTypeSet::MOMENTARY_VALUES,
        query_key: "momentary",
        xml_attribute: "momentary",
    },
    TypeFlag {
        flag: ReadoutTypeSet::PEAK_VALUES,
        query_key: "peak",
        xml_attribute: "peak",
    },
    TypeFlag {
        flag: ReadoutTypeSet::STATUS_VALUES,
        query_key: "status",
        xml_attribute: "status",
    },
    TypeFlag {
        flag: ReadoutTypeSet::COMPUTED,
        query_key: "computed",
        xml_attribute: "computed",
    },
    TypeFlag {
        flag: ReadoutTypeSet::IDENTITY,
        query_key: "identity",
        xml_attribute: "identity",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES,
        query_key: "historical",
        xml_attribute: "historical",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES_SECOND,
        query_key: "historicalsecond",
        xml_attribute: "historicalSecond",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES_MINUTE,
        query_key: "historicalminute",
        xml_attribute: "historicalMinute",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES_HOUR,
        query_key: "historicalhour",
        xml_attribute: "historicalHour",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES_DAY,
        query_key: "historicalday",
        xml_attribute: "historicalDay",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES_WEEK,
        query_key: "historicalweek",
        xml_attribute: "historicalWeek",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES_MONTH,
        query_key: "historicalmonth",
        xml_attribute: "historicalMonth",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES_QUARTER,
        query_key: "historicalquarter",
        xml_attribute: "historicalQuarter",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES_YEAR,
        query_key: "historicalyear",
        xml_attribute: "historicalYear",
    },
    TypeFlag {
        flag: ReadoutTypeSet::HISTORICAL_VALUES_OTHER,
        query_key: "historicalother",
        xml_attribute: "historicalOther",
    },
];

/// Look up a flag by its lower-case query key
pub fn flag_for_query_key(key: &str) -> Option<ReadoutTypeSet> {
    TYPE_FLAGS
        .iter()
        .find(|flag| flag.query_key == key)
        .map(|flag| flag.flag)
}
