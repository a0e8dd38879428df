//! Three-way optional attribute values
//!
//! A declared configuration or prior state distinguishes three cases for
//! every attribute:
//!
//! - [`Field::Unknown`]: absent from the record (not yet known, "known after apply")
//! - [`Field::Null`]: explicitly `null` (known to be empty)
//! - [`Field::Known`]: a concrete value
//!
//! On the wire an unknown attribute is simply left out of the JSON object, so
//! model structs put `#[serde(default, skip_serializing_if = "Field::is_unknown")]`
//! on every `Field` member.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tri-state attribute value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    /// Not present in the record
    #[default]
    Unknown,
    /// Present and explicitly null
    Null,
    /// Present with a value
    Known(T),
}

impl<T> Field<T> {
    /// `true` if the attribute was absent
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// `true` if the attribute was explicitly null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `true` if the attribute carries a value
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Borrow the value, if any
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Take the value, if any
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Borrowing view
    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Unknown => Field::Unknown,
            Self::Null => Field::Null,
            Self::Known(v) => Field::Known(v),
        }
    }

    /// Map the inner value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Unknown => Field::Unknown,
            Self::Null => Field::Null,
            Self::Known(v) => Field::Known(f(v)),
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    /// `None` maps to an explicit null, never to unknown
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Unknown fields are skipped by the containing struct; if one
            // reaches here it is written as null.
            Self::Unknown | Self::Null => serializer.serialize_none(),
            Self::Known(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
