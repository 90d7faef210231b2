//! Property tests: chunking invariance and consumed-byte bounds.

use proptest::prelude::*;

use h3_sans_io::{frame_type, varint, H3FrameDecoder};

use crate::support::{frame, Event, RecordingVisitor};

/// A frame the generator can produce valid wire bytes for.
#[derive(Debug, Clone)]
enum TestFrame {
    Data(Vec<u8>),
    Headers(Vec<u8>),
    Metadata(Vec<u8>),
    GoAway(u64),
    MaxPushId(u64),
    Settings(Vec<(u64, u64)>),
    Unknown(u64, Vec<u8>),
}

impl TestFrame {
    fn wire(&self) -> Vec<u8> {
        match self {
            Self::Data(payload) => frame(frame_type::DATA, payload),
            Self::Headers(payload) => frame(frame_type::HEADERS, payload),
            Self::Metadata(payload) => frame(frame_type::METADATA, payload),
            Self::GoAway(id) => frame(frame_type::GOAWAY, &varint::encode(*id).unwrap()),
            Self::MaxPushId(id) => frame(frame_type::MAX_PUSH_ID, &varint::encode(*id).unwrap()),
            Self::Settings(pairs) => {
                let mut payload = Vec::new();
                for (identifier, value) in pairs {
                    payload.extend(varint::encode(*identifier).unwrap());
                    payload.extend(varint::encode(*value).unwrap());
                }
                frame(frame_type::SETTINGS, &payload)
            }
            Self::Unknown(ty, payload) => frame(*ty, payload),
        }
    }
}

fn test_frame_strategy() -> impl Strategy<Value = TestFrame> {
    let payload = proptest::collection::vec(any::<u8>(), 0..32);
    prop_oneof![
        payload.clone().prop_map(TestFrame::Data),
        payload.clone().prop_map(TestFrame::Headers),
        payload.clone().prop_map(TestFrame::Metadata),
        (0u64..1 << 20).prop_map(TestFrame::GoAway),
        (0u64..1 << 20).prop_map(TestFrame::MaxPushId),
        proptest::collection::btree_map(0u64..64, 0u64..1 << 20, 0..4)
            .prop_map(|pairs| TestFrame::Settings(pairs.into_iter().collect())),
        // 0x21..0x40 collides with no recognized frame type.
        (0x21u64..0x40, payload).prop_map(|(ty, payload)| TestFrame::Unknown(ty, payload)),
    ]
}

fn frames_and_cuts() -> impl Strategy<Value = (Vec<TestFrame>, Vec<usize>)> {
    proptest::collection::vec(test_frame_strategy(), 0..5).prop_flat_map(|frames| {
        let wire_length = frames.iter().map(|frame| frame.wire().len()).sum::<usize>();
        let cuts = proptest::collection::vec(0..=wire_length, 0..6);
        (Just(frames), cuts)
    })
}

/// Coalesce adjacent payload fragments of the same frame; fragmentation
/// is allowed to differ between feeds, the byte content is not.
fn normalized(events: &[Event]) -> Vec<Event> {
    let mut result: Vec<Event> = Vec::new();
    for event in events {
        let coalesced = match (result.last_mut(), event) {
            (Some(Event::DataPayload(merged)), Event::DataPayload(bytes))
            | (Some(Event::HeadersPayload(merged)), Event::HeadersPayload(bytes))
            | (Some(Event::MetadataPayload(merged)), Event::MetadataPayload(bytes))
            | (Some(Event::PushPromisePayload(merged)), Event::PushPromisePayload(bytes))
            | (Some(Event::UnknownPayload(merged)), Event::UnknownPayload(bytes)) => {
                merged.extend_from_slice(bytes);
                true
            }
            _ => false,
        };
        if !coalesced {
            result.push(event.clone());
        }
    }
    result
}

proptest! {
    #[test]
    fn test_chunking_is_invariant((frames, cuts) in frames_and_cuts()) {
        let mut cuts = cuts;
        let mut wire = Vec::new();
        for frame in &frames {
            wire.extend(frame.wire());
        }

        let mut whole = H3FrameDecoder::new(RecordingVisitor::new());
        prop_assert_eq!(whole.process_input(&wire), wire.len());

        let mut chunked = H3FrameDecoder::new(RecordingVisitor::new());
        cuts.sort_unstable();
        let mut start = 0;
        for cut in cuts.into_iter().chain(std::iter::once(wire.len())) {
            let chunk = &wire[start..cut];
            prop_assert_eq!(chunked.process_input(chunk), chunk.len());
            start = cut;
        }

        prop_assert_eq!(whole.error(), chunked.error());
        prop_assert_eq!(
            normalized(&whole.visitor().events),
            normalized(&chunked.visitor().events)
        );
    }

    #[test]
    fn test_consumed_never_exceeds_input(input in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut decoder = H3FrameDecoder::new(RecordingVisitor::new());

        let consumed = decoder.process_input(&input);

        prop_assert!(consumed <= input.len());
    }

    #[test]
    fn test_trailing_garbage_does_not_change_frame_callbacks(
        payload in proptest::collection::vec(any::<u8>(), 0..16),
        garbage in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        let clean = frame(frame_type::DATA, &payload);
        let mut dirty = clean.clone();
        dirty.extend_from_slice(&garbage);

        let mut clean_decoder = H3FrameDecoder::new(RecordingVisitor::new());
        clean_decoder.process_input(&clean);
        let mut dirty_decoder = H3FrameDecoder::new(RecordingVisitor::new());
        dirty_decoder.process_input(&dirty);

        let frame_events = clean_decoder.visitor().events.len();
        prop_assert_eq!(
            &dirty_decoder.visitor().events[..frame_events],
            &clean_decoder.visitor().events[..]
        );
    }
}
