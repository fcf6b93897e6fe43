//! Tests for splitting header blocks into HEADERS + CONTINUATION

use bytes::Bytes;
use h2_hpack_framer::{flags, FrameSplitter, FrameType};

fn block(len: usize) -> Bytes {
    Bytes::from(vec![0xab; len])
}

#[test]
fn test_block_smaller_than_frame() {
    let frames = FrameSplitter::new(1, false, 16384).split(block(100));
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].frame_type, FrameType::Headers);
    assert_eq!(frames[0].flags, flags::END_HEADERS);
}

#[test]
fn test_block_equal_to_frame() {
    let frames = FrameSplitter::new(1, true, 150).split(block(150));
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].flags, flags::END_HEADERS | flags::END_STREAM);
}

#[test]
fn test_block_one_over_frame() {
    let frames = FrameSplitter::new(1, true, 150).split(block(151));
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].length(), 150);
    assert_eq!(frames[0].flags, flags::END_STREAM);
    assert_eq!(frames[1].length(), 1);
    assert_eq!(frames[1].flags, flags::END_HEADERS);
}

#[test]
fn test_exact_multiple_of_frame_size() {
    let frames = FrameSplitter::new(1, false, 150).split(block(450));
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|f| f.length() == 150));
    assert!(frames[2].is_end_headers());
    assert!(!frames[1].is_end_headers());
}

#[test]
fn test_continuations_never_carry_end_stream() {
    let frames = FrameSplitter::new(1, true, 10).split(block(95));
    assert_eq!(frames.len(), 10);
    assert!(frames[0].is_end_stream());
    assert!(frames[1..].iter().all(|f| !f.is_end_stream()));
    assert!(frames[1..].iter().all(|f| f.frame_type == FrameType::Continuation));
}

#[test]
fn test_empty_block() {
    let frames = FrameSplitter::new(1, false, 150).split(Bytes::new());
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].length(), 0);
    assert_eq!(frames[0].flags, flags::END_HEADERS);
}

#[test]
fn test_stream_id_reserved_bit_cleared() {
    let frames = FrameSplitter::new(0xdeadbeef, false, 4).split(block(9));
    assert!(frames.iter().all(|f| f.stream_id == 0x5eadbeef));
}
