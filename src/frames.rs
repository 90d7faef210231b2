//! HTTP/3 frame types and structured frame payloads.
//!
//! Frame type codes follow RFC 9114 Section 7.2 plus the extension
//! frames the decoder understands (PRIORITY_UPDATE, ACCEPT_CH,
//! WebTransport stream preface, METADATA).

use std::collections::HashMap;

/// HTTP/3 frame types (RFC 9114 Section 7.2 and extensions)
#[allow(dead_code)]
pub mod frame_type {
    pub const DATA: u64 = 0x00;
    pub const HEADERS: u64 = 0x01;
    pub const CANCEL_PUSH: u64 = 0x03;
    pub const SETTINGS: u64 = 0x04;
    pub const PUSH_PROMISE: u64 = 0x05;
    pub const GOAWAY: u64 = 0x07;
    pub const MAX_PUSH_ID: u64 = 0x0d;
    /// PRIORITY_UPDATE encoding from early drafts of the priorities
    /// scheme, carrying an explicit element-type octet.
    pub const PRIORITY_UPDATE_OBSOLETE: u64 = 0x0f;
    /// PRIORITY_UPDATE for request streams (RFC 9218).
    pub const PRIORITY_UPDATE_REQUEST_STREAM: u64 = 0x800f_0700;
    /// ACCEPT_CH (draft-davidben-http-client-hint-reliability).
    pub const ACCEPT_CH: u64 = 0x4089;
    /// WebTransport stream preface (draft-ietf-webtrans-http3).
    pub const WEBTRANSPORT_STREAM: u64 = 0x41;
    /// METADATA (draft-beky-httpbis-metadata).
    pub const METADATA: u64 = 0x4d;
}

/// HTTP/3 settings identifiers (RFC 9114 Section 7.2.4.1)
#[allow(dead_code)]
pub mod settings_id {
    pub const QPACK_MAX_TABLE_CAPACITY: u64 = 0x01;
    pub const MAX_FIELD_SECTION_SIZE: u64 = 0x06;
    pub const QPACK_BLOCKED_STREAMS: u64 = 0x07;
    pub const H3_DATAGRAM: u64 = 0x33;
}

/// A parsed SETTINGS frame: identifier/value pairs, both varint62 on the
/// wire. An empty payload decodes to an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsFrame {
    pub values: HashMap<u64, u64>,
}

/// A parsed CANCEL_PUSH frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelPushFrame {
    pub push_id: u64,
}

/// A parsed GOAWAY frame. The identifier is a stream id or a push id
/// depending on the sender; the decoder does not distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoAwayFrame {
    pub id: u64,
}

/// A parsed MAX_PUSH_ID frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPushIdFrame {
    pub push_id: u64,
}

/// The element a PRIORITY_UPDATE frame reprioritizes. Only the obsolete
/// encoding carries this on the wire (0x00 or 0x80); the RFC 9218
/// encoding is implicitly about request streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrioritizedElementType {
    RequestStream,
    PushStream,
}

impl PrioritizedElementType {
    pub(crate) fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::RequestStream),
            0x80 => Some(Self::PushStream),
            _ => None,
        }
    }
}

/// A parsed PRIORITY_UPDATE frame. The field value is the remainder of
/// the payload, kept as raw bytes; interpreting the priority parameters
/// is the consumer's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityUpdateFrame {
    pub prioritized_element_type: PrioritizedElementType,
    pub prioritized_element_id: u64,
    pub priority_field_value: Vec<u8>,
}

/// One origin/value entry of an ACCEPT_CH frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptChOriginValuePair {
    pub origin: Vec<u8>,
    pub value: Vec<u8>,
}

/// A parsed ACCEPT_CH frame. An empty payload decodes to an empty entry
/// list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptChFrame {
    pub entries: Vec<AcceptChOriginValuePair>,
}
