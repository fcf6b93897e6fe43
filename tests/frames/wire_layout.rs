//! Tests for the serialized 9-byte frame header and payload

use bytes::{Bytes, BytesMut};
use h2_hpack_framer::{
    frame_type, write_frames, Frame, FrameHeader, FrameSplitter, FrameType, FRAME_HEADER_LEN,
};

#[test]
fn test_headers_frame_layout() {
    let frame = Frame {
        frame_type: FrameType::Headers,
        flags: 0x5,
        stream_id: 1,
        payload: Bytes::from_static(&[0x82, 0x86, 0x84]),
    };
    let bytes = frame.to_bytes();
    assert_eq!(&bytes[..], [0, 0, 3, 1, 5, 0, 0, 0, 1, 0x82, 0x86, 0x84]);
}

#[test]
fn test_length_is_24_bit_big_endian() {
    let frames = FrameSplitter::new(3, false, 70_000).split(Bytes::from(vec![0; 70_000]));
    let bytes = frames[0].to_bytes();
    assert_eq!(&bytes[..3], [0x01, 0x11, 0x70]);
    assert_eq!(bytes.len(), FRAME_HEADER_LEN + 70_000);
}

#[test]
fn test_parse_roundtrip_of_header() {
    let frame = Frame {
        frame_type: FrameType::Continuation,
        flags: 0x4,
        stream_id: 0x7fff_ffff,
        payload: Bytes::from_static(b"abc"),
    };
    let header = FrameHeader::parse(&frame.to_bytes()).unwrap();
    assert_eq!(header, frame.header());
    assert_eq!(header.frame_type, frame_type::CONTINUATION);
    assert_eq!(header.stream_id, 0x7fff_ffff);
}

#[test]
fn test_write_frames_into_bytes_mut() {
    let frames = FrameSplitter::new(1, false, 2).split(Bytes::from_static(b"abcde"));
    let mut sink = BytesMut::new();
    write_frames(&frames, &mut sink);

    assert_eq!(sink.len(), 3 * FRAME_HEADER_LEN + 5);
    assert_eq!(&sink[9..11], b"ab");
    assert_eq!(sink[11 + 3], frame_type::CONTINUATION);
    assert_eq!(&sink[20..22], b"cd");
    assert_eq!(sink[22 + 4], 0x4);
    assert_eq!(&sink[31..], b"e");
}
