//! HPACK field encoding (RFC 7541 Sections 5 and 6).
//!
//! [`FieldEncoder`] turns one header field into one HPACK representation and
//! applies the matching change to the dynamic table. Representation choice is
//! a closed set ([`Representation`]); each kind has its own emit function.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::config::IndexingPolicy;
use crate::fields::HeaderField;
use crate::huffman;
use crate::table::{static_index, DynamicTable, STATIC_TABLE_LEN};

/// First octet of a true-binary value literal.
///
/// Base64 text never starts with `0x00`, so a decoder that sees this octet
/// knows the rest of the literal is raw binary.
pub const TRUE_BINARY_MARKER: u8 = 0x00;

/// Representation prefixes (RFC 7541 Section 6).
pub mod prefix {
    pub const INDEXED: u8 = 0x80;
    pub const LITERAL_INCREMENTAL_INDEXING: u8 = 0x40;
    pub const LITERAL_WITHOUT_INDEXING: u8 = 0x00;
    pub const TABLE_SIZE_UPDATE: u8 = 0x20;
    pub const HUFFMAN: u8 = 0x80;
}

/// How a field was represented on the wire.
///
/// Indices are in the combined HPACK address space: static entries are
/// 1..=61, dynamic entries follow with the newest at 62.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// `1xxxxxxx`: the whole field is a table reference.
    Indexed { index: usize },
    /// `01xxxxxx`: literal value, added to the dynamic table.
    /// `name_index` is `None` when the name is sent as a new literal.
    LiteralIncrementalIndexing { name_index: Option<usize> },
    /// `0000xxxx`: literal value, table untouched.
    LiteralWithoutIndexing { name_index: Option<usize> },
}

impl Representation {
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }

    pub fn has_new_name(&self) -> bool {
        matches!(
            self,
            Self::LiteralIncrementalIndexing { name_index: None }
                | Self::LiteralWithoutIndexing { name_index: None }
        )
    }
}

/// The encoding of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedField {
    pub representation: Representation,
    pub bytes: Bytes,
}

/// Encode an integer with an N-bit prefix (RFC 7541 Section 5.1).
///
/// `flags` supplies the bits above the prefix in the first octet.
pub fn encode_integer(value: usize, prefix_bits: u8, flags: u8, dst: &mut impl BufMut) {
    debug_assert!((1..=8).contains(&prefix_bits));
    let max_prefix = (1usize << prefix_bits) - 1;
    if value < max_prefix {
        dst.put_u8(flags | value as u8);
        return;
    }
    dst.put_u8(flags | max_prefix as u8);
    let mut rest = value - max_prefix;
    while rest >= 128 {
        dst.put_u8((rest % 128) as u8 | 0x80);
        rest /= 128;
    }
    dst.put_u8(rest as u8);
}

/// Encode a string literal (RFC 7541 Section 5.2), Huffman-coded only when
/// that is strictly shorter than the raw octets.
pub fn encode_string(src: &[u8], allow_huffman: bool, dst: &mut impl BufMut) {
    let huffman_len = huffman::encoded_len(src);
    if allow_huffman && huffman_len < src.len() {
        encode_integer(huffman_len, 7, prefix::HUFFMAN, dst);
        huffman::encode(src, dst);
    } else {
        encode_raw_string(src, dst);
    }
}

/// Encode a string literal as raw octets.
pub fn encode_raw_string(src: &[u8], dst: &mut impl BufMut) {
    encode_integer(src.len(), 7, 0, dst);
    dst.put_slice(src);
}

/// Dynamic table size update (RFC 7541 Section 6.3).
pub fn encode_size_update(size: usize, dst: &mut impl BufMut) {
    encode_integer(size, 5, prefix::TABLE_SIZE_UPDATE, dst);
}

/// Value as it travels on the wire, which is also what a decoder indexes.
pub fn transport_value(field: &HeaderField, use_true_binary_metadata: bool) -> Bytes {
    if !field.is_binary() {
        return field.value.clone();
    }
    if use_true_binary_metadata {
        let mut value = BytesMut::with_capacity(field.value.len() + 1);
        value.put_u8(TRUE_BINARY_MARKER);
        value.put_slice(&field.value);
        value.freeze()
    } else {
        Bytes::from(STANDARD_NO_PAD.encode(&field.value))
    }
}

/// Encodes fields against a borrowed dynamic table for the length of one
/// header block.
pub struct FieldEncoder<'a> {
    table: &'a mut DynamicTable,
    policy: &'a IndexingPolicy,
    huffman: bool,
    huffman_text_values: bool,
    use_true_binary_metadata: bool,
    scratch: BytesMut,
}

impl<'a> FieldEncoder<'a> {
    pub fn new(table: &'a mut DynamicTable, policy: &'a IndexingPolicy) -> Self {
        Self {
            table,
            policy,
            huffman: true,
            huffman_text_values: false,
            use_true_binary_metadata: false,
            scratch: BytesMut::new(),
        }
    }

    pub fn huffman(mut self, enabled: bool) -> Self {
        self.huffman = enabled;
        self
    }

    /// Also Huffman-code plain (non `-bin`) values. Off by default: text
    /// values go out as raw octets, like gRPC peers expect.
    pub fn huffman_text_values(mut self, enabled: bool) -> Self {
        self.huffman_text_values = enabled;
        self
    }

    pub fn true_binary_metadata(mut self, enabled: bool) -> Self {
        self.use_true_binary_metadata = enabled;
        self
    }

    /// Encode one field, updating the dynamic table when the chosen
    /// representation asks the peer to index it.
    pub fn encode(&mut self, field: &HeaderField) -> EncodedField {
        let value = transport_value(field, self.use_true_binary_metadata);
        let value_huffman = self.value_huffman(field);
        let name = field.name.as_bytes();
        let representation = self.select(field, &value);

        match representation {
            Representation::Indexed { index } => self.emit_indexed(index),
            Representation::LiteralIncrementalIndexing { name_index } => {
                self.emit_literal_incremental(name_index, name, &value, value_huffman);
                self.table.insert(Bytes::copy_from_slice(name), value);
            }
            Representation::LiteralWithoutIndexing { name_index } => {
                self.emit_literal_without_indexing(name_index, name, &value, value_huffman);
            }
        }

        trace!(
            name = %field.name,
            ?representation,
            len = self.scratch.len(),
            "encoded header field"
        );
        EncodedField {
            representation,
            bytes: self.scratch.split().freeze(),
        }
    }

    /// True-binary values are always raw; base64 text follows `huffman`.
    fn value_huffman(&self, field: &HeaderField) -> bool {
        if !field.is_binary() {
            self.huffman && self.huffman_text_values
        } else {
            self.huffman && !self.use_true_binary_metadata
        }
    }

    fn select(&self, field: &HeaderField, value: &[u8]) -> Representation {
        let name = field.name.as_bytes();
        if let Some(index) = static_index(name, value) {
            return Representation::Indexed { index };
        }
        if let Some(index) = self.table.find_index(name, value) {
            return Representation::Indexed {
                index: STATIC_TABLE_LEN + index,
            };
        }
        let name_index = self
            .table
            .find_name_index(name)
            .map(|index| STATIC_TABLE_LEN + index);
        if self.table.can_index(name, value) && self.policy.allows(&field.name) {
            Representation::LiteralIncrementalIndexing { name_index }
        } else {
            Representation::LiteralWithoutIndexing { name_index }
        }
    }

    fn emit_indexed(&mut self, index: usize) {
        encode_integer(index, 7, prefix::INDEXED, &mut self.scratch);
    }

    fn emit_literal_incremental(
        &mut self,
        name_index: Option<usize>,
        name: &[u8],
        value: &[u8],
        value_huffman: bool,
    ) {
        encode_integer(
            name_index.unwrap_or(0),
            6,
            prefix::LITERAL_INCREMENTAL_INDEXING,
            &mut self.scratch,
        );
        self.emit_literal_strings(name_index, name, value, value_huffman);
    }

    fn emit_literal_without_indexing(
        &mut self,
        name_index: Option<usize>,
        name: &[u8],
        value: &[u8],
        value_huffman: bool,
    ) {
        encode_integer(
            name_index.unwrap_or(0),
            4,
            prefix::LITERAL_WITHOUT_INDEXING,
            &mut self.scratch,
        );
        self.emit_literal_strings(name_index, name, value, value_huffman);
    }

    fn emit_literal_strings(
        &mut self,
        name_index: Option<usize>,
        name: &[u8],
        value: &[u8],
        value_huffman: bool,
    ) {
        if name_index.is_none() {
            encode_string(name, self.huffman, &mut self.scratch);
        }
        encode_string(value, value_huffman, &mut self.scratch);
    }
}
