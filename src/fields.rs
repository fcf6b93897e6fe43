//! Header fields fed to the compressor.
//!
//! [`HeaderFields`] is the ordered, validated source of `(key, value)` pairs.
//! Order is preserved exactly: HPACK indexing and HTTP/2 semantics are both
//! order-sensitive.

use bytes::Bytes;

use crate::error::AppendError;

/// Keys ending with this suffix carry binary values.
pub const BINARY_SUFFIX: &str = "-bin";

/// Returns true if `key` names binary metadata.
pub fn is_binary_key(key: &str) -> bool {
    key.len() > BINARY_SUFFIX.len() && key.ends_with(BINARY_SUFFIX)
}

/// A single header field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: String,
    pub value: Bytes,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Build a field, rejecting keys and values a peer would treat as malformed.
    pub fn validated(
        name: impl Into<String>,
        value: impl Into<Bytes>,
    ) -> Result<Self, AppendError> {
        let field = Self::new(name, value);
        validate_key(&field.name)?;
        if !field.is_binary() && !field.value.iter().all(|&b| is_value_byte(b)) {
            return Err(AppendError::InvalidValue { key: field.name });
        }
        Ok(field)
    }

    pub fn is_binary(&self) -> bool {
        is_binary_key(&self.name)
    }

    /// Raw size before compression: key plus value octets.
    pub fn raw_len(&self) -> usize {
        self.name.len() + self.value.len()
    }
}

fn validate_key(key: &str) -> Result<(), AppendError> {
    let body = key.strip_prefix(':').unwrap_or(key);
    if key.is_empty() {
        return Err(AppendError::EmptyKey);
    }
    if body.is_empty() || !body.bytes().all(is_key_byte) {
        return Err(AppendError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn is_key_byte(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.')
}

fn is_value_byte(b: u8) -> bool {
    matches!(b, b'\t' | 0x20..=0x7e)
}

/// Ordered collection of validated header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    fields: Vec<HeaderField>,
}

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field at the end.
    ///
    /// A rejected field is not added; earlier fields stay in place.
    pub fn append(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Bytes>,
    ) -> Result<(), AppendError> {
        self.fields.push(HeaderField::validated(key, value)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeaderField> {
        self.fields.iter()
    }

    /// Build a collection from pairs, stopping at the first rejected field.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, AppendError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bytes>,
    {
        let mut fields = Self::new();
        for (key, value) in pairs {
            fields.append(key, value)?;
        }
        Ok(fields)
    }
}

impl<'a> IntoIterator for &'a HeaderFields {
    type Item = &'a HeaderField;
    type IntoIter = std::slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
