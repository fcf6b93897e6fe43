//! Byte-exact header blocks

use bytes::BytesMut;
use h2_hpack_framer::{
    CompressorConfig, EncodeOptions, EncodeStats, HeaderCompressor, HeaderFields, IndexingPolicy,
};

use super::verify_frames;

fn encode_to_bytes(
    compressor: &mut HeaderCompressor,
    is_eof: bool,
    pairs: &[(&'static str, &'static str)],
) -> Vec<u8> {
    let fields = HeaderFields::try_from_pairs(pairs.iter().copied()).unwrap();
    let options = EncodeOptions::new(0xdeadbeef).end_stream(is_eof).max_frame_size(16384);
    let mut stats = EncodeStats::default();
    let mut out = BytesMut::new();
    compressor
        .encode_headers_into(options, &fields, &mut stats, &mut out)
        .unwrap();
    verify_frames(&out, is_eof, 16384);
    out.to_vec()
}

#[test]
fn test_single_field_literal_new_name() {
    let mut compressor = HeaderCompressor::new();
    let out = encode_to_bytes(&mut compressor, false, &[("a", "a")]);
    assert_eq!(
        out,
        [0x00, 0x00, 0x05, 0x01, 0x04, 0x5e, 0xad, 0xbe, 0xef, 0x40, 0x01, 0x61, 0x01, 0x61]
    );
}

#[test]
fn test_grpc_policy_matches_unindexed_layout() {
    let config = CompressorConfig::new().with_indexing(IndexingPolicy::grpc());

    let mut compressor = HeaderCompressor::with_config(config.clone());
    let out = encode_to_bytes(&mut compressor, false, &[("a", "a")]);
    assert_eq!(
        out,
        [0x00, 0x00, 0x05, 0x01, 0x04, 0x5e, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x61, 0x01, 0x61]
    );

    let mut compressor = HeaderCompressor::with_config(config);
    let out = encode_to_bytes(&mut compressor, false, &[("a", "a"), ("b", "c")]);
    assert_eq!(
        out,
        [
            0x00, 0x00, 0x0a, 0x01, 0x04, 0x5e, 0xad, 0xbe, 0xef,
            0x00, 0x01, 0x61, 0x01, 0x61,
            0x00, 0x01, 0x62, 0x01, 0x63,
        ]
    );
}

#[test]
fn test_end_stream_on_single_frame() {
    let mut compressor = HeaderCompressor::new();
    let out = encode_to_bytes(&mut compressor, true, &[("a", "a")]);
    assert_eq!(out[4], 0x05);
}

#[test]
fn test_second_encode_is_indexed() {
    let mut compressor = HeaderCompressor::new();
    encode_to_bytes(&mut compressor, false, &[("a", "a")]);
    let out = encode_to_bytes(&mut compressor, false, &[("a", "a")]);
    assert_eq!(out, [0x00, 0x00, 0x01, 0x01, 0x04, 0x5e, 0xad, 0xbe, 0xef, 0xbe]);
}

#[test]
fn test_static_table_hits_are_single_octets() {
    let mut compressor = HeaderCompressor::new();
    let out = encode_to_bytes(
        &mut compressor,
        false,
        &[(":method", "GET"), (":scheme", "http"), (":path", "/")],
    );
    assert_eq!(&out[9..], [0x82, 0x86, 0x84]);
}
