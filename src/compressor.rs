//! Header compressor: HPACK-encodes header fields and frames the result.
//!
//! One [`HeaderCompressor`] belongs to one direction of one connection. Its
//! dynamic table lives as long as the compressor, so header blocks must be
//! encoded in the order they are written to the wire. Every encode method
//! takes `&mut self`; share an instance between threads only behind a lock
//! held for the whole call.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::config::CompressorConfig;
use crate::error::{EncodeError, Result};
use crate::fields::{HeaderField, HeaderFields};
use crate::frame::{
    self, Frame, FrameSplitter, DEFAULT_MAX_FRAME_SIZE, MAX_FRAME_LENGTH, STREAM_ID_MASK,
};
use crate::hpack::{encode_size_update, EncodedField, FieldEncoder};
use crate::table::DynamicTable;

/// Per-call parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub stream_id: u32,
    /// Set END_STREAM on the HEADERS frame.
    pub is_eof: bool,
    /// Send `-bin` values as raw octets instead of base64 text.
    pub use_true_binary_metadata: bool,
    pub max_frame_size: u32,
}

impl EncodeOptions {
    pub fn new(stream_id: u32) -> Self {
        Self {
            stream_id,
            is_eof: false,
            use_true_binary_metadata: false,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    pub fn end_stream(mut self, is_eof: bool) -> Self {
        self.is_eof = is_eof;
        self
    }

    pub fn true_binary_metadata(mut self, enabled: bool) -> Self {
        self.use_true_binary_metadata = enabled;
        self
    }

    pub fn max_frame_size(mut self, size: u32) -> Self {
        self.max_frame_size = size;
        self
    }

    /// Check the options before any state is touched.
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_size == 0 || self.max_frame_size > MAX_FRAME_LENGTH {
            return Err(EncodeError::InvalidFrameSize(self.max_frame_size));
        }
        Ok(())
    }
}

/// Running byte counters, accumulated across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Key and value octets handed to the compressor.
    pub uncompressed_bytes: u64,
    /// HPACK block octets produced.
    pub compressed_bytes: u64,
    /// Frame header octets produced.
    pub framing_bytes: u64,
    pub header_blocks: u64,
}

impl EncodeStats {
    /// Everything written to the wire for header blocks.
    pub fn wire_bytes(&self) -> u64 {
        self.compressed_bytes + self.framing_bytes
    }
}

/// HPACK compressor owning one dynamic table.
#[derive(Debug, Default)]
pub struct HeaderCompressor {
    table: DynamicTable,
    config: CompressorConfig,
    /// Smallest capacity set since the last block; RFC 7541 Section 4.2
    /// requires signalling it before the final one.
    pending_min_size: Option<usize>,
    pending_size_update: bool,
}

impl HeaderCompressor {
    /// Compressor with [`CompressorConfig::default`]: every field that fits
    /// is indexed. Use [`IndexingPolicy::grpc`](crate::IndexingPolicy::grpc)
    /// through [`with_config`](Self::with_config) to get gRPC's wire layout,
    /// where only a fixed set of keys is indexed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompressorConfig) -> Self {
        let table = DynamicTable::new(config.max_table_size);
        let pending_size_update = config.max_table_size != crate::table::DEFAULT_TABLE_CAPACITY;
        Self {
            table,
            config,
            pending_min_size: None,
            pending_size_update,
        }
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Read-only view of the dynamic table.
    pub fn table(&self) -> &DynamicTable {
        &self.table
    }

    /// Change the dynamic table capacity.
    ///
    /// Entries are evicted immediately and the next header block begins
    /// with a dynamic table size update so the peer decoder follows.
    pub fn set_max_table_size(&mut self, size: usize) {
        if size == self.table.capacity() && !self.pending_size_update {
            return;
        }
        debug!(from = self.table.capacity(), to = size, "dynamic table size change");
        if size < self.table.capacity() {
            let min = self.pending_min_size.map_or(size, |m| m.min(size));
            self.pending_min_size = Some(min);
        }
        self.table.set_capacity(size);
        self.pending_size_update = true;
    }

    /// Encode `fields` and split the block into frames.
    ///
    /// Fields are encoded in iteration order. `stats` is accumulated, not
    /// reset. Invalid options are rejected before the table is touched.
    pub fn encode_headers<'a, I>(
        &mut self,
        options: EncodeOptions,
        fields: I,
        stats: &mut EncodeStats,
    ) -> Result<Vec<Frame>>
    where
        I: IntoIterator<Item = &'a HeaderField>,
    {
        options.validate()?;
        if options.stream_id & !STREAM_ID_MASK != 0 {
            warn!(stream_id = options.stream_id, "reserved stream id bit set, clearing it");
        }

        let block = self.encode_block_with_stats(fields, options.use_true_binary_metadata, stats);
        let splitter =
            FrameSplitter::new(options.stream_id, options.is_eof, options.max_frame_size);
        let frames = splitter.split(block);

        stats.framing_bytes += (frames.len() * frame::FRAME_HEADER_LEN) as u64;
        debug!(
            stream_id = options.stream_id & STREAM_ID_MASK,
            frames = frames.len(),
            end_stream = options.is_eof,
            "framed header block"
        );
        Ok(frames)
    }

    /// Validate raw pairs and encode them.
    ///
    /// A malformed pair fails the whole call with [`EncodeError::Append`]
    /// before anything is encoded.
    pub fn encode_pairs<I, K, V>(
        &mut self,
        options: EncodeOptions,
        pairs: I,
        stats: &mut EncodeStats,
    ) -> Result<Vec<Frame>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bytes>,
    {
        let fields = HeaderFields::try_from_pairs(pairs)?;
        self.encode_headers(options, &fields, stats)
    }

    /// Encode and write the serialized frames straight into `dst`.
    ///
    /// Returns the number of bytes written.
    pub fn encode_headers_into<'a, I>(
        &mut self,
        options: EncodeOptions,
        fields: I,
        stats: &mut EncodeStats,
        dst: &mut impl BufMut,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = &'a HeaderField>,
    {
        let frames = self.encode_headers(options, fields, stats)?;
        frame::write_frames(&frames, dst);
        Ok(frames.iter().map(Frame::encoded_len).sum())
    }

    /// Encode an unframed HPACK block, for callers that do their own framing.
    pub fn encode_block<'a, I>(&mut self, fields: I, use_true_binary_metadata: bool) -> Bytes
    where
        I: IntoIterator<Item = &'a HeaderField>,
    {
        let mut stats = EncodeStats::default();
        self.encode_block_with_stats(fields, use_true_binary_metadata, &mut stats)
    }

    /// Encode fields one at a time, returning each field's representation.
    ///
    /// Any pending table size update is emitted as its own leading entry.
    pub fn encode_fields<'a, I>(
        &mut self,
        fields: I,
        use_true_binary_metadata: bool,
    ) -> (Option<Bytes>, Vec<EncodedField>)
    where
        I: IntoIterator<Item = &'a HeaderField>,
    {
        let mut prelude = BytesMut::new();
        self.write_size_updates(&mut prelude);
        let prelude = (!prelude.is_empty()).then(|| prelude.freeze());

        let mut encoder = FieldEncoder::new(&mut self.table, &self.config.indexing)
            .huffman(self.config.huffman)
            .huffman_text_values(self.config.huffman_text_values)
            .true_binary_metadata(use_true_binary_metadata);
        let encoded = fields.into_iter().map(|field| encoder.encode(field)).collect();
        (prelude, encoded)
    }

    fn encode_block_with_stats<'a, I>(
        &mut self,
        fields: I,
        use_true_binary_metadata: bool,
        stats: &mut EncodeStats,
    ) -> Bytes
    where
        I: IntoIterator<Item = &'a HeaderField>,
    {
        let mut block = BytesMut::new();
        self.write_size_updates(&mut block);

        let mut count = 0usize;
        let mut encoder = FieldEncoder::new(&mut self.table, &self.config.indexing)
            .huffman(self.config.huffman)
            .huffman_text_values(self.config.huffman_text_values)
            .true_binary_metadata(use_true_binary_metadata);
        for field in fields {
            let encoded = encoder.encode(field);
            block.put_slice(&encoded.bytes);
            stats.uncompressed_bytes += field.raw_len() as u64;
            count += 1;
        }

        stats.compressed_bytes += block.len() as u64;
        stats.header_blocks += 1;
        debug!(
            fields = count,
            block_len = block.len(),
            table_used = self.table.used(),
            "encoded header block"
        );
        block.freeze()
    }

    fn write_size_updates(&mut self, dst: &mut BytesMut) {
        if !self.pending_size_update {
            return;
        }
        if let Some(min) = self.pending_min_size.take() {
            if min < self.table.capacity() {
                encode_size_update(min, dst);
            }
        }
        encode_size_update(self.table.capacity(), dst);
        self.pending_size_update = false;
    }
}
