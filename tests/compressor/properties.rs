//! Property-based tests for the compressor.
//!
//! # Properties
//! - Round trip: an independent HPACK decoder recovers every field, in order,
//!   across consecutive header blocks on one connection
//! - Framing: HEADERS first, CONTINUATION after, END_HEADERS last only,
//!   END_STREAM on HEADERS only, no payload over `max_frame_size`
//! - Table accounting: `used <= capacity` after every block

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use bytes::Bytes;
use h2_hpack_framer::{EncodeOptions, EncodeStats, HeaderCompressor, HeaderField};
use proptest::prelude::*;

use super::{decode_block, verify_frames};

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Small key alphabet so that names repeat and hit the table.
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("content-type".to_string()),
        Just("user-agent".to_string()),
        Just(":path".to_string()),
        Just("grpc-trace-bin".to_string()),
        "[a-z][a-z0-9-]{0,12}",
        "x-[a-z]{1,6}-bin",
    ]
}

fn arb_field(max_len: usize) -> impl Strategy<Value = HeaderField> {
    (arb_key(), any::<bool>()).prop_flat_map(move |(key, long)| {
        let max = if long { max_len } else { 24 };
        let value = if key.ends_with("-bin") {
            proptest::collection::vec(any::<u8>(), 0..max).boxed()
        } else {
            proptest::collection::vec(0x20u8..0x7f, 0..max).boxed()
        };
        value.prop_map(move |v| HeaderField::new(key.clone(), Bytes::from(v)))
    })
}

fn arb_block() -> impl Strategy<Value = Vec<HeaderField>> {
    proptest::collection::vec(arb_field(600), 0..12)
}

/// Blocks whose entries always fit together in a default-size table.
fn arb_short_block() -> impl Strategy<Value = Vec<HeaderField>> {
    proptest::collection::vec(arb_field(24), 0..12)
}

fn expected_value(field: &HeaderField, decoded: &[u8], true_binary: bool) -> bool {
    if !field.is_binary() {
        return decoded == &field.value[..];
    }
    if true_binary {
        decoded.first() == Some(&0) && &decoded[1..] == &field.value[..]
    } else {
        STANDARD_NO_PAD.decode(decoded).map(|v| v[..] == field.value[..]).unwrap_or(false)
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_roundtrip_across_blocks(
        blocks in proptest::collection::vec(arb_block(), 1..6),
        max_frame_size in 1u32..300,
        is_eof in any::<bool>(),
        true_binary in any::<bool>(),
    ) {
        let mut compressor = HeaderCompressor::new();
        let mut decoder = fluke_hpack::Decoder::new();
        let mut stats = EncodeStats::default();

        for (i, fields) in blocks.iter().enumerate() {
            let options = EncodeOptions::new(2 * i as u32 + 1)
                .end_stream(is_eof)
                .true_binary_metadata(true_binary)
                .max_frame_size(max_frame_size);
            let mut out: Vec<u8> = Vec::new();
            compressor.encode_headers_into(options, fields, &mut stats, &mut out).unwrap();

            let block = verify_frames(&out, is_eof, max_frame_size as usize);
            let decoded = decode_block(&mut decoder, &block);

            prop_assert_eq!(decoded.len(), fields.len());
            for (field, (name, value)) in fields.iter().zip(decoded.iter()) {
                prop_assert_eq!(name.as_slice(), field.name.as_bytes());
                prop_assert!(expected_value(field, value, true_binary));
            }
            prop_assert!(compressor.table().used() <= compressor.table().capacity());
        }
        prop_assert_eq!(stats.header_blocks, blocks.len() as u64);
    }

    #[test]
    fn prop_repeat_block_is_fully_indexed(fields in arb_short_block()) {
        let mut compressor = HeaderCompressor::new();
        compressor.encode_block(&fields, false);

        let (_, encoded) = compressor.encode_fields(&fields, false);
        for field in &encoded {
            prop_assert!(field.representation.is_indexed());
        }
    }
}
