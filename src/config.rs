//! Compressor configuration.

use std::collections::HashSet;

use crate::table::DEFAULT_TABLE_CAPACITY;

/// Keys indexed under [`IndexingPolicy::grpc`].
const GRPC_INDEXED_KEYS: &[&str] = &[
    "user-agent",
    "grpc-trace-bin",
    "grpc-tags-bin",
    "content-type",
    "te",
    "grpc-encoding",
    "grpc-accept-encoding",
    "grpc-internal-encoding-request",
];

/// Which fields may be added to the dynamic table.
///
/// The default, [`Incremental`](Self::Incremental), indexes every field, so a
/// fresh compressor sends `("a", "a")` as `40 01 61 01 61`. Peers comparing
/// against gRPC's encoder output (`00 01 61 01 61`) should use
/// [`IndexingPolicy::grpc`].
///
/// Regardless of policy, a field whose entry would not fit in the table is
/// always sent as a literal without indexing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndexingPolicy {
    /// Every field that fits is indexed.
    #[default]
    Incremental,
    /// Only fields with one of these keys are indexed. All other fields are
    /// sent as literals without indexing and never touch the table.
    KnownKeys(HashSet<String>),
}

impl IndexingPolicy {
    /// Index only keys that repeat across gRPC calls with stable values.
    pub fn grpc() -> Self {
        Self::known_keys(GRPC_INDEXED_KEYS.iter().copied())
    }

    pub fn known_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self::KnownKeys(keys.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, key: &str) -> bool {
        match self {
            Self::Incremental => true,
            Self::KnownKeys(keys) => keys.contains(key),
        }
    }
}

/// Construction parameters for a [`HeaderCompressor`](crate::HeaderCompressor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressorConfig {
    /// Initial dynamic table capacity in octets.
    pub max_table_size: usize,
    pub indexing: IndexingPolicy,
    /// Allow Huffman-coded names and base64 values when they are shorter.
    pub huffman: bool,
    /// Also Huffman-code plain text values. Needs `huffman`.
    pub huffman_text_values: bool,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            max_table_size: DEFAULT_TABLE_CAPACITY,
            indexing: IndexingPolicy::default(),
            huffman: true,
            huffman_text_values: false,
        }
    }
}

impl CompressorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_table_size(mut self, size: usize) -> Self {
        self.max_table_size = size;
        self
    }

    pub fn with_indexing(mut self, indexing: IndexingPolicy) -> Self {
        self.indexing = indexing;
        self
    }

    pub fn with_huffman(mut self, huffman: bool) -> Self {
        self.huffman = huffman;
        self
    }

    pub fn with_huffman_text_values(mut self, enabled: bool) -> Self {
        self.huffman_text_values = enabled;
        self
    }
}
