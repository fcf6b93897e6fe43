//! HPACK indexing tables (RFC 7541 Section 2.3).
//!
//! The dynamic table is a bounded FIFO of fields this encoder has told the
//! peer to index. Its contents must track the peer decoder's table exactly,
//! so every mutation here mirrors one representation written to the wire.

use std::collections::VecDeque;

use bytes::Bytes;

/// Per-entry overhead defined by RFC 7541 Section 4.1.
pub const ENTRY_OVERHEAD: usize = 32;

/// Number of entries in the static table. Dynamic indices start after it.
pub const STATIC_TABLE_LEN: usize = 61;

/// HTTP/2 initial SETTINGS_HEADER_TABLE_SIZE.
pub const DEFAULT_TABLE_CAPACITY: usize = 4096;

/// A dynamic table entry. `value` holds the transport form of the value,
/// i.e. exactly the octets a decoder stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicEntry {
    name: Bytes,
    value: Bytes,
}

impl DynamicEntry {
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn size(&self) -> usize {
        size_of(&self.name, &self.value)
    }
}

/// Size an entry would occupy: `len(name) + len(value) + 32`.
pub fn size_of(name: &[u8], value: &[u8]) -> usize {
    name.len() + value.len() + ENTRY_OVERHEAD
}

/// Dynamic table with FIFO eviction. Newest entry has relative index 1.
#[derive(Debug, Clone)]
pub struct DynamicTable {
    entries: VecDeque<DynamicEntry>,
    capacity: usize,
    used: usize,
}

impl Default for DynamicTable {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_CAPACITY)
    }
}

impl DynamicTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
            used: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest entry that can ever be indexed.
    pub fn max_entry_size(&self) -> usize {
        self.capacity
    }

    /// Sum of the sizes of all entries.
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at relative index (1 = newest).
    pub fn get(&self, index: usize) -> Option<&DynamicEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Relative index of an exact (name, value) match.
    pub fn find_index(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name() == name && e.value() == value)
            .map(|i| i + 1)
    }

    /// Relative index of the newest entry with this name.
    pub fn find_name_index(&self, name: &[u8]) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name).map(|i| i + 1)
    }

    /// True iff the entry fits in an empty table.
    pub fn can_index(&self, name: &[u8], value: &[u8]) -> bool {
        size_of(name, value) <= self.max_entry_size()
    }

    /// Insert a new entry, evicting the oldest ones until it fits.
    ///
    /// An entry that cannot fit even in an empty table is not inserted and
    /// the table is left untouched. Returns whether the entry was added.
    pub fn insert(&mut self, name: impl Into<Bytes>, value: impl Into<Bytes>) -> bool {
        let entry = DynamicEntry {
            name: name.into(),
            value: value.into(),
        };
        let size = entry.size();
        if size > self.max_entry_size() {
            return false;
        }
        while self.used + size > self.capacity {
            self.evict_oldest();
        }
        self.used += size;
        self.entries.push_front(entry);
        true
    }

    /// Change the capacity, evicting oldest entries until `used <= capacity`.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.used > self.capacity {
            self.evict_oldest();
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(entry) = self.entries.pop_back() {
            self.used -= entry.size();
        }
    }
}

/// RFC 7541 Appendix A. Index `i` lives at `STATIC_TABLE[i - 1]`.
const STATIC_TABLE: [(&[u8], &[u8]); STATIC_TABLE_LEN] = [
    (b":authority", b""),
    (b":method", b"GET"),
    (b":method", b"POST"),
    (b":path", b"/"),
    (b":path", b"/index.html"),
    (b":scheme", b"http"),
    (b":scheme", b"https"),
    (b":status", b"200"),
    (b":status", b"204"),
    (b":status", b"206"),
    (b":status", b"304"),
    (b":status", b"400"),
    (b":status", b"404"),
    (b":status", b"500"),
    (b"accept-charset", b""),
    (b"accept-encoding", b"gzip, deflate"),
    (b"accept-language", b""),
    (b"accept-ranges", b""),
    (b"accept", b""),
    (b"access-control-allow-origin", b""),
    (b"age", b""),
    (b"allow", b""),
    (b"authorization", b""),
    (b"cache-control", b""),
    (b"content-disposition", b""),
    (b"content-encoding", b""),
    (b"content-language", b""),
    (b"content-length", b""),
    (b"content-location", b""),
    (b"content-range", b""),
    (b"content-type", b""),
    (b"cookie", b""),
    (b"date", b""),
    (b"etag", b""),
    (b"expect", b""),
    (b"expires", b""),
    (b"from", b""),
    (b"host", b""),
    (b"if-match", b""),
    (b"if-modified-since", b""),
    (b"if-none-match", b""),
    (b"if-range", b""),
    (b"if-unmodified-since", b""),
    (b"last-modified", b""),
    (b"link", b""),
    (b"location", b""),
    (b"max-forwards", b""),
    (b"proxy-authenticate", b""),
    (b"proxy-authorization", b""),
    (b"range", b""),
    (b"referer", b""),
    (b"refresh", b""),
    (b"retry-after", b""),
    (b"server", b""),
    (b"set-cookie", b""),
    (b"strict-transport-security", b""),
    (b"transfer-encoding", b""),
    (b"user-agent", b""),
    (b"vary", b""),
    (b"via", b""),
    (b"www-authenticate", b""),
];

/// Static table index of an exact (name, value) match.
///
/// Entries with an empty value only match an empty value.
pub fn static_index(name: &[u8], value: &[u8]) -> Option<usize> {
    STATIC_TABLE
        .iter()
        .position(|&(n, v)| n == name && v == value)
        .map(|i| i + 1)
}
