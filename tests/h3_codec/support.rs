//! Shared test plumbing: a recording visitor and wire builders.

use h3_sans_io::{
    varint, AcceptChFrame, CancelPushFrame, DecoderError, GoAwayFrame, H3FrameVisitor,
    MaxPushIdFrame, PriorityUpdateFrame, SettingsFrame,
};

/// Every callback the decoder can make, in the order it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Error(DecoderError),
    SettingsStart(u64),
    Settings(SettingsFrame),
    DataStart(u64, u64),
    DataPayload(Vec<u8>),
    DataEnd,
    HeadersStart(u64, u64),
    HeadersPayload(Vec<u8>),
    HeadersEnd,
    MetadataStart(u64, u64),
    MetadataPayload(Vec<u8>),
    MetadataEnd,
    CancelPush(CancelPushFrame),
    GoAway(GoAwayFrame),
    MaxPushId(MaxPushIdFrame),
    PushPromiseStart(u64),
    PushPromisePushId {
        push_id: u64,
        push_id_length: u64,
        header_block_length: u64,
    },
    PushPromisePayload(Vec<u8>),
    PushPromiseEnd,
    PriorityUpdateStart(u64),
    PriorityUpdate(PriorityUpdateFrame),
    AcceptChStart(u64),
    AcceptCh(AcceptChFrame),
    WebTransportStreamType { header_length: u64, session_id: u64 },
    UnknownStart(u64, u64, u64),
    UnknownPayload(Vec<u8>),
    UnknownEnd,
}

/// Records every callback and can be scripted to pause on the callback
/// that records the event at a given index.
#[derive(Debug, Default)]
pub struct RecordingVisitor {
    pub events: Vec<Event>,
    pub pause_at: Option<usize>,
}

impl RecordingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pausing_at(index: usize) -> Self {
        Self {
            events: Vec::new(),
            pause_at: Some(index),
        }
    }

    fn record(&mut self, event: Event) -> bool {
        self.events.push(event);
        self.pause_at != Some(self.events.len() - 1)
    }
}

impl H3FrameVisitor for RecordingVisitor {
    fn on_error(&mut self, error: &DecoderError) {
        self.events.push(Event::Error(error.clone()));
    }

    fn on_settings_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::SettingsStart(header_length))
    }
    fn on_settings_frame(&mut self, frame: &SettingsFrame) -> bool {
        self.record(Event::Settings(frame.clone()))
    }

    fn on_data_frame_start(&mut self, header_length: u64, payload_length: u64) -> bool {
        self.record(Event::DataStart(header_length, payload_length))
    }
    fn on_data_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.record(Event::DataPayload(payload.to_vec()))
    }
    fn on_data_frame_end(&mut self) -> bool {
        self.record(Event::DataEnd)
    }

    fn on_headers_frame_start(&mut self, header_length: u64, payload_length: u64) -> bool {
        self.record(Event::HeadersStart(header_length, payload_length))
    }
    fn on_headers_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.record(Event::HeadersPayload(payload.to_vec()))
    }
    fn on_headers_frame_end(&mut self) -> bool {
        self.record(Event::HeadersEnd)
    }

    fn on_metadata_frame_start(&mut self, header_length: u64, payload_length: u64) -> bool {
        self.record(Event::MetadataStart(header_length, payload_length))
    }
    fn on_metadata_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.record(Event::MetadataPayload(payload.to_vec()))
    }
    fn on_metadata_frame_end(&mut self) -> bool {
        self.record(Event::MetadataEnd)
    }

    fn on_cancel_push_frame(&mut self, frame: &CancelPushFrame) -> bool {
        self.record(Event::CancelPush(*frame))
    }
    fn on_goaway_frame(&mut self, frame: &GoAwayFrame) -> bool {
        self.record(Event::GoAway(*frame))
    }
    fn on_max_push_id_frame(&mut self, frame: &MaxPushIdFrame) -> bool {
        self.record(Event::MaxPushId(*frame))
    }

    fn on_push_promise_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::PushPromiseStart(header_length))
    }
    fn on_push_promise_frame_push_id(
        &mut self,
        push_id: u64,
        push_id_length: u64,
        header_block_length: u64,
    ) -> bool {
        self.record(Event::PushPromisePushId {
            push_id,
            push_id_length,
            header_block_length,
        })
    }
    fn on_push_promise_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.record(Event::PushPromisePayload(payload.to_vec()))
    }
    fn on_push_promise_frame_end(&mut self) -> bool {
        self.record(Event::PushPromiseEnd)
    }

    fn on_priority_update_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::PriorityUpdateStart(header_length))
    }
    fn on_priority_update_frame(&mut self, frame: &PriorityUpdateFrame) -> bool {
        self.record(Event::PriorityUpdate(frame.clone()))
    }

    fn on_accept_ch_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::AcceptChStart(header_length))
    }
    fn on_accept_ch_frame(&mut self, frame: &AcceptChFrame) -> bool {
        self.record(Event::AcceptCh(frame.clone()))
    }

    fn on_web_transport_stream_frame_type(&mut self, header_length: u64, session_id: u64) {
        self.events.push(Event::WebTransportStreamType {
            header_length,
            session_id,
        });
    }

    fn on_unknown_frame_start(
        &mut self,
        frame_type: u64,
        header_length: u64,
        payload_length: u64,
    ) -> bool {
        self.record(Event::UnknownStart(frame_type, header_length, payload_length))
    }
    fn on_unknown_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.record(Event::UnknownPayload(payload.to_vec()))
    }
    fn on_unknown_frame_end(&mut self) -> bool {
        self.record(Event::UnknownEnd)
    }
}

/// Build a frame: `type varint || length varint || payload`.
pub fn frame(frame_type: u64, payload: &[u8]) -> Vec<u8> {
    let mut wire = varint::encode(frame_type).unwrap();
    wire.extend(varint::encode(payload.len() as u64).unwrap());
    wire.extend_from_slice(payload);
    wire
}
