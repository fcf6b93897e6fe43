//! HTTP/2 header-block framing (RFC 7540 Sections 4.1, 6.2, 6.10).
//!
//! [`FrameSplitter`] cuts an encoded header block into one HEADERS frame
//! followed by as many CONTINUATION frames as `max_frame_size` requires.
//! It only sees bytes and flags; it knows nothing about HPACK.

use bytes::{BufMut, Bytes};

/// Size of the fixed frame header.
pub const FRAME_HEADER_LEN: usize = 9;

/// Largest payload the 24-bit length field can describe.
pub const MAX_FRAME_LENGTH: u32 = (1 << 24) - 1;

/// HTTP/2 initial SETTINGS_MAX_FRAME_SIZE.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16_384;

/// Mask for the 31-bit stream identifier.
pub const STREAM_ID_MASK: u32 = 0x7FFF_FFFF;

/// HTTP/2 frame types used for header blocks (RFC 7540 Section 6)
pub mod frame_type {
    pub const HEADERS: u8 = 0x1;
    pub const CONTINUATION: u8 = 0x9;
}

/// HTTP/2 frame flags
pub mod flags {
    pub const END_STREAM: u8 = 0x1;
    pub const END_HEADERS: u8 = 0x4;
}

/// Type of a header-block frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Headers,
    Continuation,
}

impl FrameType {
    pub fn code(self) -> u8 {
        match self {
            Self::Headers => frame_type::HEADERS,
            Self::Continuation => frame_type::CONTINUATION,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            frame_type::HEADERS => Some(Self::Headers),
            frame_type::CONTINUATION => Some(Self::Continuation),
            _ => None,
        }
    }
}

/// A 9-byte frame header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub length: u32,      // 24 bits
    pub frame_type: u8,
    pub flags: u8,
    pub stream_id: u32,   // 31 bits (high bit reserved)
}

impl FrameHeader {
    /// Parse a 9-byte frame header
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < FRAME_HEADER_LEN {
            return None;
        }

        let length = ((data[0] as u32) << 16) | ((data[1] as u32) << 8) | (data[2] as u32);
        let stream_id = u32::from_be_bytes([data[5], data[6], data[7], data[8]]) & STREAM_ID_MASK;

        Some(Self {
            length,
            frame_type: data[3],
            flags: data[4],
            stream_id,
        })
    }

    /// Serialize the header. The reserved stream bit is always written as 0.
    pub fn write(&self, dst: &mut impl BufMut) {
        debug_assert!(self.length <= MAX_FRAME_LENGTH);
        dst.put_uint(u64::from(self.length), 3);
        dst.put_u8(self.frame_type);
        dst.put_u8(self.flags);
        dst.put_u32(self.stream_id & STREAM_ID_MASK);
    }

    /// Total frame size including header
    pub fn total_size(&self) -> usize {
        FRAME_HEADER_LEN + self.length as usize
    }

    pub fn is_end_stream(&self) -> bool {
        self.flags & flags::END_STREAM != 0
    }

    pub fn is_end_headers(&self) -> bool {
        self.flags & flags::END_HEADERS != 0
    }
}

/// One frame of a header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub frame_type: FrameType,
    pub flags: u8,
    pub stream_id: u32,
    pub payload: Bytes,
}

impl Frame {
    /// Payload length; always equal to `payload.len()`.
    pub fn length(&self) -> u32 {
        self.payload.len() as u32
    }

    pub fn header(&self) -> FrameHeader {
        FrameHeader {
            length: self.length(),
            frame_type: self.frame_type.code(),
            flags: self.flags,
            stream_id: self.stream_id,
        }
    }

    pub fn is_end_stream(&self) -> bool {
        self.flags & flags::END_STREAM != 0
    }

    pub fn is_end_headers(&self) -> bool {
        self.flags & flags::END_HEADERS != 0
    }

    /// Bytes written by [`Frame::encode`].
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_LEN + self.payload.len()
    }

    /// Write the frame header followed by the payload.
    pub fn encode(&self, dst: &mut impl BufMut) {
        self.header().write(dst);
        dst.put_slice(&self.payload);
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf: Vec<u8> = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        Bytes::from(buf)
    }
}

/// Serialize frames, in order, into one sink.
pub fn write_frames<'a>(frames: impl IntoIterator<Item = &'a Frame>, dst: &mut impl BufMut) {
    for frame in frames {
        frame.encode(dst);
    }
}

/// Splits a header block into HEADERS + CONTINUATION frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameSplitter {
    stream_id: u32,
    end_stream: bool,
    max_frame_size: usize,
}

impl FrameSplitter {
    /// `max_frame_size` must be non-zero; the compressor validates it
    /// before a splitter is built.
    pub fn new(stream_id: u32, end_stream: bool, max_frame_size: u32) -> Self {
        debug_assert!(max_frame_size > 0 && max_frame_size <= MAX_FRAME_LENGTH);
        Self {
            stream_id: stream_id & STREAM_ID_MASK,
            end_stream,
            max_frame_size: max_frame_size.max(1) as usize,
        }
    }

    /// Number of frames `split` produces for a block of `block_len` bytes.
    pub fn frame_count(&self, block_len: usize) -> usize {
        block_len.div_ceil(self.max_frame_size).max(1)
    }

    /// Cut `block` into frames without copying the payload.
    ///
    /// An empty block still yields one (empty) HEADERS frame, and a block
    /// whose length is a multiple of `max_frame_size` gets no trailing
    /// empty CONTINUATION.
    pub fn split(&self, mut block: Bytes) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(self.frame_count(block.len()));
        loop {
            let take = block.len().min(self.max_frame_size);
            let payload = block.split_to(take);
            let first = frames.is_empty();
            let last = block.is_empty();

            let mut flags_byte = 0;
            if first && self.end_stream {
                flags_byte |= flags::END_STREAM;
            }
            if last {
                flags_byte |= flags::END_HEADERS;
            }

            frames.push(Frame {
                frame_type: if first { FrameType::Headers } else { FrameType::Continuation },
                flags: flags_byte,
                stream_id: self.stream_id,
                payload,
            });

            if last {
                return frames;
            }
        }
    }
}
