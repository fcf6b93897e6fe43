//! Property-based tests for the frame splitter.

use bytes::Bytes;
use h2_hpack_framer::{FrameSplitter, FrameType};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_split_preserves_bytes_and_flags(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        max_frame_size in 1u32..512,
        stream_id in 1u32..=0x7fff_ffff,
        end_stream in any::<bool>(),
    ) {
        let splitter = FrameSplitter::new(stream_id, end_stream, max_frame_size);
        let frames = splitter.split(Bytes::from(data.clone()));

        prop_assert_eq!(frames.len(), splitter.frame_count(data.len()));
        prop_assert_eq!(frames[0].frame_type, FrameType::Headers);
        prop_assert_eq!(frames[0].is_end_stream(), end_stream);

        let end_headers: Vec<_> = frames.iter().map(|f| f.is_end_headers()).collect();
        prop_assert_eq!(end_headers.iter().filter(|&&e| e).count(), 1);
        prop_assert!(end_headers[end_headers.len() - 1]);

        for frame in &frames[1..] {
            prop_assert_eq!(frame.frame_type, FrameType::Continuation);
            prop_assert!(!frame.is_end_stream());
            prop_assert!(frame.length() > 0);
        }
        for frame in &frames {
            prop_assert!(frame.length() <= max_frame_size);
            prop_assert_eq!(frame.stream_id, stream_id);
        }

        let rejoined: Vec<u8> = frames.iter().flat_map(|f| f.payload.iter().copied()).collect();
        prop_assert_eq!(rejoined, data);
    }
}
