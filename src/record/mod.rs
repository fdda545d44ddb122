//! Record Module
//!
//! Structured records and their binary encoding.
//!
//! ## Data Model
//! - A `Field` is a `(name, value)` pair of arbitrary byte strings
//! - A `Record` is an ordered list of fields; names may repeat
//! - Field order is preserved through encode/decode
//!
//! ## Wire Format
//! See [`codec`] for the byte layout.

pub mod codec;

use std::str::FromStr;

use crate::error::FieldKvError;

pub use codec::{decode, encode, encoded_len};

/// A single name/value pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl Field {
    /// Create a field from anything convertible to bytes
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Exact byte-wise match on both name and value
    pub fn matches(&self, name: &[u8], value: &[u8]) -> bool {
        self.name == name && self.value == value
    }
}

/// Parses `NAME=VALUE`, splitting on the first `=`
///
/// The value may itself contain `=`; the name may not.
impl FromStr for Field {
    type Err = FieldKvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok(Field::new(name, value)),
            _ => Err(FieldKvError::InvalidField(s.to_string())),
        }
    }
}

/// An ordered sequence of fields, stored as one value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Append a field (builder style)
    pub fn with_field(mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a field
    pub fn push(&mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.fields.push(Field::new(name, value));
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// True if any field has exactly this name and value.
    /// Stops at the first match.
    pub fn contains(&self, name: &[u8], value: &[u8]) -> bool {
        self.fields.iter().any(|f| f.matches(name, value))
    }

    /// Value of the first field with the given name
    pub fn first_value(&self, name: &[u8]) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_slice())
    }
}

impl From<Vec<Field>> for Record {
    fn from(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

impl<N, V> FromIterator<(N, V)> for Record
where
    N: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(n, v)| Field::new(n, v)).collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
