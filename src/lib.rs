//! h2-hpack-framer: a sans-I/O HPACK header compressor for HTTP/2
//!
//! This crate turns an ordered list of header fields into an HPACK header
//! block (RFC 7541) and splits it into HTTP/2 HEADERS and CONTINUATION
//! frames (RFC 7540), keeping the dynamic table state a connection needs
//! across header blocks.
//!
//! # Features
//!
//! - **Sans-I/O Design**: No async runtime, no sockets; frames come back as
//!   values or get written into any `bytes::BufMut`
//! - **Stateful HPACK**: Dynamic table with RFC 7541 size accounting and FIFO
//!   eviction, table size updates, Huffman-coded names and base64 values
//!   when shorter (text values stay raw unless enabled)
//! - **Binary Metadata**: `-bin` keys sent as base64 text or as raw
//!   "true binary" octets
//! - **Correct Framing**: END_STREAM only on HEADERS, END_HEADERS only on the
//!   last frame, no frame larger than the negotiated maximum
//!
//! # Quick Start
//!
//! ```rust
//! use h2_hpack_framer::{EncodeOptions, EncodeStats, HeaderCompressor, HeaderFields};
//!
//! // One compressor per connection direction
//! let mut compressor = HeaderCompressor::new();
//!
//! let mut fields = HeaderFields::new();
//! fields.append(":status", "200").unwrap();
//! fields.append("content-type", "application/grpc").unwrap();
//!
//! let mut stats = EncodeStats::default();
//! let options = EncodeOptions::new(1).end_stream(false);
//! let frames = compressor.encode_headers(options, &fields, &mut stats).unwrap();
//!
//! assert_eq!(frames.len(), 1);
//! assert!(frames[0].is_end_headers());
//! ```
//!
//! # Architecture
//!
//! - [`table`]: dynamic table (and static table lookup)
//! - [`hpack`]: per-field representation choice and encoding
//! - [`frame`]: HEADERS/CONTINUATION splitting and frame serialization
//! - [`compressor`]: the orchestrator that owns the table
//!
//! It does NOT provide:
//! - HPACK decoding
//! - Flow control, stream multiplexing or SETTINGS handling
//! - TCP/TLS transport (you move the bytes)

pub mod compressor;
pub mod config;
pub mod error;
pub mod fields;
pub mod frame;
pub mod hpack;
pub mod huffman;
pub mod table;

pub use compressor::{EncodeOptions, EncodeStats, HeaderCompressor};
pub use config::{CompressorConfig, IndexingPolicy};
pub use error::{AppendError, EncodeError};
pub use fields::{is_binary_key, HeaderField, HeaderFields, BINARY_SUFFIX};
pub use frame::{
    flags, frame_type, write_frames, Frame, FrameHeader, FrameSplitter, FrameType,
    DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_LEN,
};
pub use hpack::{EncodedField, FieldEncoder, Representation, TRUE_BINARY_MARKER};
pub use table::DynamicTable;
