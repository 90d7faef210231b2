//! Incremental HTTP/3 frame decoder.
//!
//! This is a push-driven, sans-I/O parser for the frame layer of an
//! HTTP/3 stream. Bytes go in through [`H3FrameDecoder::process_input`]
//! in whatever fragments the transport produces; frame boundaries and
//! payload fragments come out through the [`H3FrameVisitor`] callbacks.
//! The decoder never buffers a streamed payload — DATA, HEADERS,
//! PUSH_PROMISE header blocks, METADATA and unknown frames are forwarded
//! as they arrive, so the consumer controls memory and backpressure.
//!
//! It does NOT provide:
//! - QUIC stream reassembly (you provide ordered bytes)
//! - QPACK header decompression (header blocks are forwarded opaque)
//! - HTTP semantics or stream-type rules (which frames are legal where)
//!
//! Reference: RFC 9114 (HTTP/3), RFC 9000 Section 16 (varint62)

use std::collections::hash_map::Entry;

use thiserror::Error;
use tracing::trace;

use crate::frames::{
    frame_type, AcceptChFrame, AcceptChOriginValuePair, CancelPushFrame, GoAwayFrame,
    MaxPushIdFrame, PrioritizedElementType, PriorityUpdateFrame, SettingsFrame,
};
use crate::varint::{self, Varint62Progress, Varint62Reader};

/// Maximum payload the decoder will buffer for frames parsed atomically
/// (SETTINGS, PRIORITY_UPDATE, ACCEPT_CH). Frames whose payload is a
/// single varint cap at the varint maximum instead. Prevents unbounded
/// memory growth from malicious/buggy length fields.
pub const MAX_BUFFERED_FRAME_PAYLOAD: u64 = 256 * 1024;

/// Frame types that exist in HTTP/2 but are forbidden in HTTP/3
/// (RFC 9114 Section 7.2.8): PRIORITY, PING, WINDOW_UPDATE, CONTINUATION.
const HTTP2_ONLY_FRAME_TYPES: [u64; 4] = [0x02, 0x06, 0x08, 0x09];

/// Decoding errors. Once raised, an error is sticky: the decoder calls
/// [`H3FrameVisitor::on_error`] exactly once and every later
/// `process_input` is a no-op returning 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoderError {
    /// Generic framing violation; the message pinpoints the field that
    /// could not be read or the rule that was broken.
    #[error("{detail}")]
    Frame { detail: &'static str },

    /// A frame declared a payload length above the cap for its type.
    #[error("Frame is too large.")]
    FrameTooLarge,

    /// A SETTINGS payload carried the same identifier twice.
    #[error("Duplicate setting identifier.")]
    DuplicateSettingIdentifier,

    /// A frame type that only exists in HTTP/2 appeared on the stream.
    #[error("HTTP/2 frame received in a HTTP/3 connection: {frame_type}")]
    ReceivedHttp2Frame { frame_type: u64 },

    /// `process_input` was called again after a WebTransport stream
    /// preface ended frame decoding for good.
    #[error("HTTP/3 frame decoder called after an indefinite-length frame")]
    IndefiniteFrameMisuse,
}

/// Per-instance decoder configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderOptions {
    /// Treat frame type 0x41 as a WebTransport stream preface: the varint
    /// after the type is a session id, the rest of the stream belongs to
    /// WebTransport, and the decoder refuses further input.
    pub allow_web_transport_stream: bool,

    /// Reject CANCEL_PUSH and PUSH_PROMISE as soon as their type varint
    /// completes instead of surfacing them to the visitor.
    pub error_on_http3_push: bool,

    /// Interpret the RFC 9218 PRIORITY_UPDATE encoding (type 0x800f0700)
    /// and stream the obsolete 0x0f encoding as an unknown frame. When
    /// unset the obsolete encoding is interpreted and the RFC 9218 one is
    /// streamed as unknown. Never both on one instance.
    pub ignore_old_priority_update_frame: bool,
}

/// Consumer callbacks for decoded frames.
///
/// Every `bool`-returning callback may return `false` to pause the
/// decoder; `process_input` then returns with everything up to and
/// including that callback's bytes consumed. Callbacks that consumed
/// wire bytes (frame starts, payload fragments, the PUSH_PROMISE push
/// id) are not repeated after a pause. Callbacks that consume zero
/// additional bytes (frame ends and the atomic `on_*_frame` value
/// callbacks) are re-invoked on every later `process_input` until they
/// return `true`.
///
/// Payload slices borrow from the caller's input buffer and must be
/// copied if they are to outlive the callback.
///
/// All methods default to "continue", so an implementation only spells
/// out the frames it cares about.
pub trait H3FrameVisitor {
    /// Called exactly once when decoding fails. The error is also
    /// available from [`H3FrameDecoder::error`] afterwards.
    fn on_error(&mut self, _error: &DecoderError) {}

    fn on_settings_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_settings_frame(&mut self, _frame: &SettingsFrame) -> bool {
        true
    }

    fn on_data_frame_start(&mut self, _header_length: u64, _payload_length: u64) -> bool {
        true
    }
    fn on_data_frame_payload(&mut self, _payload: &[u8]) -> bool {
        true
    }
    fn on_data_frame_end(&mut self) -> bool {
        true
    }

    fn on_headers_frame_start(&mut self, _header_length: u64, _payload_length: u64) -> bool {
        true
    }
    fn on_headers_frame_payload(&mut self, _payload: &[u8]) -> bool {
        true
    }
    fn on_headers_frame_end(&mut self) -> bool {
        true
    }

    fn on_metadata_frame_start(&mut self, _header_length: u64, _payload_length: u64) -> bool {
        true
    }
    fn on_metadata_frame_payload(&mut self, _payload: &[u8]) -> bool {
        true
    }
    fn on_metadata_frame_end(&mut self) -> bool {
        true
    }

    fn on_cancel_push_frame(&mut self, _frame: &CancelPushFrame) -> bool {
        true
    }
    fn on_goaway_frame(&mut self, _frame: &GoAwayFrame) -> bool {
        true
    }
    fn on_max_push_id_frame(&mut self, _frame: &MaxPushIdFrame) -> bool {
        true
    }

    fn on_push_promise_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    /// `header_block_length` is the declared frame length minus the
    /// bytes the push id occupied.
    fn on_push_promise_frame_push_id(
        &mut self,
        _push_id: u64,
        _push_id_length: u64,
        _header_block_length: u64,
    ) -> bool {
        true
    }
    fn on_push_promise_frame_payload(&mut self, _payload: &[u8]) -> bool {
        true
    }
    fn on_push_promise_frame_end(&mut self) -> bool {
        true
    }

    fn on_priority_update_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_priority_update_frame(&mut self, _frame: &PriorityUpdateFrame) -> bool {
        true
    }

    fn on_accept_ch_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_accept_ch_frame(&mut self, _frame: &AcceptChFrame) -> bool {
        true
    }

    /// A WebTransport stream preface was read; the decoder is done with
    /// this stream and the remaining bytes belong to the session.
    fn on_web_transport_stream_frame_type(&mut self, _header_length: u64, _session_id: u64) {}

    fn on_unknown_frame_start(
        &mut self,
        _frame_type: u64,
        _header_length: u64,
        _payload_length: u64,
    ) -> bool {
        true
    }
    fn on_unknown_frame_payload(&mut self, _payload: &[u8]) -> bool {
        true
    }
    fn on_unknown_frame_end(&mut self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    ReadFrameType,
    ReadFrameLength,
    ReadFramePayload,
    FinishParsing,
    Error,
    IndefiniteFrameDone,
}

/// Incremental HTTP/3 frame decoder for one stream direction.
///
/// Not safe for concurrent use; higher layers serialize calls, typically
/// with one instance per QUIC stream direction. The instance persists
/// across frames and decodes them strictly in sequence.
#[derive(Debug)]
pub struct H3FrameDecoder<V> {
    visitor: V,
    options: DecoderOptions,
    phase: Phase,
    varint_reader: Varint62Reader,
    current_frame_type: u64,
    current_type_field_length: u64,
    current_length_field_length: u64,
    current_frame_length: u64,
    remaining_frame_length: u64,
    /// Pending push_id read at the front of a PUSH_PROMISE payload.
    push_id_reader: Option<Varint62Reader>,
    /// Accumulator for atomically parsed frames; grows only to the
    /// declared payload length.
    buffer: Vec<u8>,
    error: Option<DecoderError>,
}

impl<V: H3FrameVisitor> H3FrameDecoder<V> {
    pub fn new(visitor: V) -> Self {
        Self::with_options(visitor, DecoderOptions::default())
    }

    pub fn with_options(visitor: V, options: DecoderOptions) -> Self {
        Self {
            visitor,
            options,
            phase: Phase::ReadFrameType,
            varint_reader: Varint62Reader::new(),
            current_frame_type: 0,
            current_type_field_length: 0,
            current_length_field_length: 0,
            current_frame_length: 0,
            remaining_frame_length: 0,
            push_id_reader: None,
            buffer: Vec::new(),
            error: None,
        }
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    /// The sticky error, if decoding has failed.
    pub fn error(&self) -> Option<&DecoderError> {
        self.error.as_ref()
    }

    /// Human-readable rendering of the sticky error.
    pub fn error_detail(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Observation hook for tests; not part of the decoding contract.
    #[doc(hidden)]
    pub fn current_frame_type(&self) -> u64 {
        self.current_frame_type
    }

    /// Feed bytes to the decoder and return how many were consumed.
    ///
    /// The return value is less than `input.len()` only when the visitor
    /// paused or an error was raised; bytes up to the returned count are
    /// fully processed and must not be re-submitted. After an error this
    /// is a no-op returning 0.
    pub fn process_input(&mut self, input: &[u8]) -> usize {
        if self.error.is_some() {
            return 0;
        }
        if self.phase == Phase::IndefiniteFrameDone {
            self.raise_error(DecoderError::IndefiniteFrameMisuse);
            return 0;
        }

        let mut cursor = 0;
        let mut keep_going = true;
        while keep_going && (cursor < input.len() || self.zero_byte_work_pending()) {
            keep_going = match self.phase {
                Phase::ReadFrameType => self.read_frame_type(input, &mut cursor),
                Phase::ReadFrameLength => self.read_frame_length(input, &mut cursor),
                Phase::ReadFramePayload => self.read_frame_payload(input, &mut cursor),
                Phase::FinishParsing => self.finish_parsing(input, &mut cursor),
                Phase::Error | Phase::IndefiniteFrameDone => false,
            };
        }
        cursor
    }

    /// Work that must run even with no input left: end callbacks and
    /// complete-buffer parses consume zero additional bytes.
    fn zero_byte_work_pending(&self) -> bool {
        matches!(self.phase, Phase::ReadFramePayload | Phase::FinishParsing)
            && self.remaining_frame_length == 0
    }

    fn read_frame_type(&mut self, input: &[u8], cursor: &mut usize) -> bool {
        let Varint62Progress::Done { value, length } = self.varint_reader.read(input, cursor)
        else {
            return true;
        };
        self.current_frame_type = value;
        self.current_type_field_length = u64::from(length);
        trace!(frame_type = value, "frame type read");

        if HTTP2_ONLY_FRAME_TYPES.contains(&value) {
            self.raise_error(DecoderError::ReceivedHttp2Frame { frame_type: value });
            return false;
        }
        if self.options.error_on_http3_push {
            if value == frame_type::CANCEL_PUSH {
                self.raise_error(DecoderError::Frame {
                    detail: "CANCEL_PUSH frame received.",
                });
                return false;
            }
            if value == frame_type::PUSH_PROMISE {
                self.raise_error(DecoderError::Frame {
                    detail: "PUSH_PROMISE frame received.",
                });
                return false;
            }
        }

        self.phase = Phase::ReadFrameLength;
        true
    }

    fn read_frame_length(&mut self, input: &[u8], cursor: &mut usize) -> bool {
        let Varint62Progress::Done { value, length } = self.varint_reader.read(input, cursor)
        else {
            return true;
        };
        self.current_length_field_length = u64::from(length);

        // WebTransport stream preface: the varint after the type is a
        // session id, not a payload length, and nothing after it is a
        // frame. Decoding stops for good.
        if self.options.allow_web_transport_stream
            && self.current_frame_type == frame_type::WEBTRANSPORT_STREAM
        {
            self.phase = Phase::IndefiniteFrameDone;
            trace!(session_id = value, "WebTransport stream preface read");
            self.visitor
                .on_web_transport_stream_frame_type(self.header_length(), value);
            return false;
        }

        if value > self.max_frame_length(self.current_frame_type) {
            self.raise_error(DecoderError::FrameTooLarge);
            return false;
        }
        self.current_frame_length = value;
        self.remaining_frame_length = value;
        let header_length = self.header_length();
        trace!(
            frame_type = self.current_frame_type,
            payload_length = value,
            "frame header read"
        );

        match self.current_frame_type {
            frame_type::DATA => {
                self.phase = Phase::ReadFramePayload;
                self.visitor.on_data_frame_start(header_length, value)
            }
            frame_type::HEADERS => {
                self.phase = Phase::ReadFramePayload;
                self.visitor.on_headers_frame_start(header_length, value)
            }
            frame_type::METADATA => {
                self.phase = Phase::ReadFramePayload;
                self.visitor.on_metadata_frame_start(header_length, value)
            }
            frame_type::PUSH_PROMISE => {
                if value == 0 {
                    self.raise_error(DecoderError::Frame {
                        detail: "PUSH_PROMISE frame with empty payload.",
                    });
                    return false;
                }
                self.phase = Phase::ReadFramePayload;
                self.push_id_reader = Some(Varint62Reader::new());
                self.visitor.on_push_promise_frame_start(header_length)
            }
            frame_type::SETTINGS => {
                self.begin_buffering();
                self.visitor.on_settings_frame_start(header_length)
            }
            frame_type::CANCEL_PUSH | frame_type::GOAWAY | frame_type::MAX_PUSH_ID => {
                self.begin_buffering();
                true
            }
            frame_type::ACCEPT_CH => {
                self.begin_buffering();
                self.visitor.on_accept_ch_frame_start(header_length)
            }
            ty if self.is_interpreted_priority_update(ty) => {
                self.begin_buffering();
                self.visitor.on_priority_update_frame_start(header_length)
            }
            ty => {
                self.phase = Phase::ReadFramePayload;
                self.visitor
                    .on_unknown_frame_start(ty, header_length, value)
            }
        }
    }

    fn read_frame_payload(&mut self, input: &[u8], cursor: &mut usize) -> bool {
        // A PUSH_PROMISE payload leads with the push_id varint; it must
        // fit inside the declared payload length.
        if let Some(mut reader) = self.push_id_reader.take() {
            let limit = *cursor + self.payload_window(input.len() - *cursor);
            let before = *cursor;
            let progress = reader.read(&input[..limit], cursor);
            self.remaining_frame_length -= (*cursor - before) as u64;
            match progress {
                Varint62Progress::Done { value, length } => {
                    let header_block_length = self.current_frame_length - u64::from(length);
                    if !self.visitor.on_push_promise_frame_push_id(
                        value,
                        u64::from(length),
                        header_block_length,
                    ) {
                        return false;
                    }
                }
                Varint62Progress::Partial => {
                    if self.remaining_frame_length == 0 {
                        self.raise_error(DecoderError::Frame {
                            detail: "Unable to read PUSH_PROMISE push_id.",
                        });
                        return false;
                    }
                    self.push_id_reader = Some(reader);
                    return true;
                }
            }
        }

        if self.remaining_frame_length > 0 {
            let available = input.len() - *cursor;
            if available == 0 {
                return true;
            }
            let window = self.payload_window(available);
            let payload = &input[*cursor..*cursor + window];
            *cursor += window;
            self.remaining_frame_length -= window as u64;
            let continue_processing = match self.current_frame_type {
                frame_type::DATA => self.visitor.on_data_frame_payload(payload),
                frame_type::HEADERS => self.visitor.on_headers_frame_payload(payload),
                frame_type::METADATA => self.visitor.on_metadata_frame_payload(payload),
                frame_type::PUSH_PROMISE => self.visitor.on_push_promise_frame_payload(payload),
                _ => self.visitor.on_unknown_frame_payload(payload),
            };
            if !continue_processing {
                return false;
            }
        }

        if self.remaining_frame_length == 0 {
            let continue_processing = match self.current_frame_type {
                frame_type::DATA => self.visitor.on_data_frame_end(),
                frame_type::HEADERS => self.visitor.on_headers_frame_end(),
                frame_type::METADATA => self.visitor.on_metadata_frame_end(),
                frame_type::PUSH_PROMISE => self.visitor.on_push_promise_frame_end(),
                _ => self.visitor.on_unknown_frame_end(),
            };
            if !continue_processing {
                return false;
            }
            self.reset_for_next_frame();
        }
        true
    }

    fn finish_parsing(&mut self, input: &[u8], cursor: &mut usize) -> bool {
        if self.remaining_frame_length > 0 {
            let window = self.payload_window(input.len() - *cursor);
            self.buffer.extend_from_slice(&input[*cursor..*cursor + window]);
            *cursor += window;
            self.remaining_frame_length -= window as u64;
            if self.remaining_frame_length > 0 {
                return true;
            }
        }

        let continue_processing = match self.current_frame_type {
            frame_type::SETTINGS => match parse_settings(&self.buffer) {
                Ok(frame) => self.visitor.on_settings_frame(&frame),
                Err(error) => {
                    self.raise_error(error);
                    return false;
                }
            },
            frame_type::CANCEL_PUSH => match parse_single_varint(
                &self.buffer,
                "Unable to read CANCEL_PUSH push_id.",
                "Superfluous data in CANCEL_PUSH frame.",
            ) {
                Ok(push_id) => self.visitor.on_cancel_push_frame(&CancelPushFrame { push_id }),
                Err(error) => {
                    self.raise_error(error);
                    return false;
                }
            },
            frame_type::GOAWAY => match parse_single_varint(
                &self.buffer,
                "Unable to read GOAWAY ID.",
                "Superfluous data in GOAWAY frame.",
            ) {
                Ok(id) => self.visitor.on_goaway_frame(&GoAwayFrame { id }),
                Err(error) => {
                    self.raise_error(error);
                    return false;
                }
            },
            frame_type::MAX_PUSH_ID => match parse_single_varint(
                &self.buffer,
                "Unable to read MAX_PUSH_ID push_id.",
                "Superfluous data in MAX_PUSH_ID frame.",
            ) {
                Ok(push_id) => self.visitor.on_max_push_id_frame(&MaxPushIdFrame { push_id }),
                Err(error) => {
                    self.raise_error(error);
                    return false;
                }
            },
            frame_type::ACCEPT_CH => match parse_accept_ch(&self.buffer) {
                Ok(frame) => self.visitor.on_accept_ch_frame(&frame),
                Err(error) => {
                    self.raise_error(error);
                    return false;
                }
            },
            _ => {
                let parsed = if self.current_frame_type == frame_type::PRIORITY_UPDATE_OBSOLETE {
                    parse_priority_update_obsolete(&self.buffer)
                } else {
                    parse_priority_update(&self.buffer)
                };
                match parsed {
                    Ok(frame) => self.visitor.on_priority_update_frame(&frame),
                    Err(error) => {
                        self.raise_error(error);
                        return false;
                    }
                }
            }
        };

        if !continue_processing {
            return false;
        }
        self.reset_for_next_frame();
        true
    }

    /// Bytes of the current input that belong to the current frame.
    fn payload_window(&self, available: usize) -> usize {
        if self.remaining_frame_length < available as u64 {
            self.remaining_frame_length as usize
        } else {
            available
        }
    }

    fn header_length(&self) -> u64 {
        self.current_type_field_length + self.current_length_field_length
    }

    fn begin_buffering(&mut self) {
        self.phase = Phase::FinishParsing;
        self.buffer.clear();
        self.buffer.reserve(self.current_frame_length as usize);
    }

    fn is_interpreted_priority_update(&self, ty: u64) -> bool {
        if self.options.ignore_old_priority_update_frame {
            ty == frame_type::PRIORITY_UPDATE_REQUEST_STREAM
        } else {
            ty == frame_type::PRIORITY_UPDATE_OBSOLETE
        }
    }

    fn max_frame_length(&self, ty: u64) -> u64 {
        match ty {
            frame_type::CANCEL_PUSH | frame_type::GOAWAY | frame_type::MAX_PUSH_ID => {
                varint::MAX_ENCODED_LENGTH as u64
            }
            frame_type::SETTINGS | frame_type::ACCEPT_CH => MAX_BUFFERED_FRAME_PAYLOAD,
            ty if self.is_interpreted_priority_update(ty) => MAX_BUFFERED_FRAME_PAYLOAD,
            _ => varint::VARINT62_MAX,
        }
    }

    fn reset_for_next_frame(&mut self) {
        self.phase = Phase::ReadFrameType;
        self.current_type_field_length = 0;
        self.current_length_field_length = 0;
        self.current_frame_length = 0;
        self.remaining_frame_length = 0;
        self.push_id_reader = None;
        self.buffer.clear();
    }

    fn raise_error(&mut self, error: DecoderError) {
        trace!(error = %error, "frame decoding failed");
        self.phase = Phase::Error;
        self.error = Some(error.clone());
        self.visitor.on_error(&error);
    }
}

fn parse_settings(buf: &[u8]) -> Result<SettingsFrame, DecoderError> {
    let mut frame = SettingsFrame::default();
    let mut pos = 0;
    while pos < buf.len() {
        let Some(identifier) = varint::decode(buf, &mut pos) else {
            return Err(DecoderError::Frame {
                detail: "Unable to read setting identifier.",
            });
        };
        let Some(value) = varint::decode(buf, &mut pos) else {
            return Err(DecoderError::Frame {
                detail: "Unable to read setting value.",
            });
        };
        match frame.values.entry(identifier) {
            Entry::Occupied(_) => return Err(DecoderError::DuplicateSettingIdentifier),
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }
    Ok(frame)
}

/// CANCEL_PUSH, GOAWAY and MAX_PUSH_ID carry exactly one varint62.
fn parse_single_varint(
    buf: &[u8],
    truncated_detail: &'static str,
    superfluous_detail: &'static str,
) -> Result<u64, DecoderError> {
    let mut pos = 0;
    let Some(value) = varint::decode(buf, &mut pos) else {
        return Err(DecoderError::Frame {
            detail: truncated_detail,
        });
    };
    if pos != buf.len() {
        return Err(DecoderError::Frame {
            detail: superfluous_detail,
        });
    }
    Ok(value)
}

fn parse_priority_update_obsolete(buf: &[u8]) -> Result<PriorityUpdateFrame, DecoderError> {
    let Some(&type_byte) = buf.first() else {
        return Err(DecoderError::Frame {
            detail: "Unable to read prioritized element type.",
        });
    };
    let Some(element_type) = PrioritizedElementType::from_wire(type_byte) else {
        return Err(DecoderError::Frame {
            detail: "Invalid prioritized element type.",
        });
    };
    let mut pos = 1;
    let Some(element_id) = varint::decode(buf, &mut pos) else {
        return Err(DecoderError::Frame {
            detail: "Unable to read prioritized element id.",
        });
    };
    Ok(PriorityUpdateFrame {
        prioritized_element_type: element_type,
        prioritized_element_id: element_id,
        priority_field_value: buf[pos..].to_vec(),
    })
}

fn parse_priority_update(buf: &[u8]) -> Result<PriorityUpdateFrame, DecoderError> {
    let mut pos = 0;
    let Some(element_id) = varint::decode(buf, &mut pos) else {
        return Err(DecoderError::Frame {
            detail: "Unable to read prioritized element id.",
        });
    };
    Ok(PriorityUpdateFrame {
        prioritized_element_type: PrioritizedElementType::RequestStream,
        prioritized_element_id: element_id,
        priority_field_value: buf[pos..].to_vec(),
    })
}

fn parse_accept_ch(buf: &[u8]) -> Result<AcceptChFrame, DecoderError> {
    let mut frame = AcceptChFrame::default();
    let mut pos = 0;
    while pos < buf.len() {
        let Some(origin) = read_length_prefixed(buf, &mut pos) else {
            return Err(DecoderError::Frame {
                detail: "Unable to read ACCEPT_CH origin.",
            });
        };
        let Some(value) = read_length_prefixed(buf, &mut pos) else {
            return Err(DecoderError::Frame {
                detail: "Unable to read ACCEPT_CH value.",
            });
        };
        frame.entries.push(AcceptChOriginValuePair { origin, value });
    }
    Ok(frame)
}

fn read_length_prefixed(buf: &[u8], pos: &mut usize) -> Option<Vec<u8>> {
    let mut cursor = *pos;
    let length = varint::decode(buf, &mut cursor)?;
    let length = usize::try_from(length).ok()?;
    let end = cursor.checked_add(length)?;
    if end > buf.len() {
        return None;
    }
    let bytes = buf[cursor..end].to_vec();
    *pos = end;
    Some(bytes)
}

/// Decode a buffer expected to hold exactly one complete SETTINGS frame.
///
/// Runs a fresh decoder over `input` and returns the parsed map. Fails
/// if the first frame is not SETTINGS, if the input ends mid-frame, if
/// bytes trail the frame, or if the frame itself is malformed.
pub fn decode_settings(input: &[u8]) -> Result<SettingsFrame, DecoderError> {
    #[derive(Default)]
    struct SettingsCollector {
        frame: Option<SettingsFrame>,
        other_frame: bool,
    }

    impl SettingsCollector {
        fn reject(&mut self) -> bool {
            self.other_frame = true;
            false
        }
    }

    impl H3FrameVisitor for SettingsCollector {
        fn on_settings_frame(&mut self, frame: &SettingsFrame) -> bool {
            self.frame = Some(frame.clone());
            // One frame is all we want; stop before any trailing bytes.
            false
        }
        fn on_data_frame_start(&mut self, _: u64, _: u64) -> bool {
            self.reject()
        }
        fn on_headers_frame_start(&mut self, _: u64, _: u64) -> bool {
            self.reject()
        }
        fn on_metadata_frame_start(&mut self, _: u64, _: u64) -> bool {
            self.reject()
        }
        fn on_cancel_push_frame(&mut self, _: &CancelPushFrame) -> bool {
            self.reject()
        }
        fn on_goaway_frame(&mut self, _: &GoAwayFrame) -> bool {
            self.reject()
        }
        fn on_max_push_id_frame(&mut self, _: &MaxPushIdFrame) -> bool {
            self.reject()
        }
        fn on_push_promise_frame_start(&mut self, _: u64) -> bool {
            self.reject()
        }
        fn on_priority_update_frame_start(&mut self, _: u64) -> bool {
            self.reject()
        }
        fn on_accept_ch_frame_start(&mut self, _: u64) -> bool {
            self.reject()
        }
        fn on_unknown_frame_start(&mut self, _: u64, _: u64, _: u64) -> bool {
            self.reject()
        }
    }

    let mut decoder = H3FrameDecoder::new(SettingsCollector::default());
    let consumed = decoder.process_input(input);
    if let Some(error) = decoder.error() {
        return Err(error.clone());
    }
    match decoder.visitor().frame.clone() {
        Some(frame) if consumed == input.len() => Ok(frame),
        Some(_) => Err(DecoderError::Frame {
            detail: "Superfluous data after SETTINGS frame.",
        }),
        None if decoder.visitor().other_frame => Err(DecoderError::Frame {
            detail: "Not a SETTINGS frame.",
        }),
        None => Err(DecoderError::Frame {
            detail: "Incomplete SETTINGS frame.",
        }),
    }
}
