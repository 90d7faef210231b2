//! h3-sans-io: A minimal, sans-I/O HTTP/3 frame decoder
//!
//! This crate provides a synchronous, push-driven parser for HTTP/3
//! frames on a QUIC stream, designed for environments that own their
//! own I/O (async runtimes, WASM, test harnesses, embedded transports).
//!
//! # Features
//!
//! - **Sans-I/O design**: no runtime dependencies; you feed bytes in
//!   whatever fragments the transport produced
//! - **Incremental**: every frame field survives being split across
//!   calls, with no re-parsing and no full-frame buffering
//! - **Zero-copy payloads**: DATA, HEADERS, METADATA, PUSH_PROMISE and
//!   unknown frame payloads are forwarded as borrowed slices
//! - **Backpressure**: any callback can pause the decoder at an exact
//!   byte position and resume later
//! - **WebTransport**: optional handling of the `0x41` stream preface
//! - **Precise errors**: distinct error kinds with human-readable detail
//!
//! # Quick Start
//!
//! ```rust
//! use h3_sans_io::{H3FrameDecoder, H3FrameVisitor};
//!
//! #[derive(Default)]
//! struct BodyCollector {
//!     body: Vec<u8>,
//! }
//!
//! impl H3FrameVisitor for BodyCollector {
//!     fn on_data_frame_payload(&mut self, payload: &[u8]) -> bool {
//!         self.body.extend_from_slice(payload);
//!         true
//!     }
//! }
//!
//! let mut decoder = H3FrameDecoder::new(BodyCollector::default());
//!
//! // A DATA frame: type 0x00, length 5, payload "Data!"
//! let consumed = decoder.process_input(&[0x00, 0x05, b'D', b'a', b't', b'a', b'!']);
//!
//! assert_eq!(consumed, 7);
//! assert!(decoder.error().is_none());
//! assert_eq!(decoder.visitor().body, b"Data!");
//! ```
//!
//! # Architecture
//!
//! This crate is intentionally minimal. It provides:
//! - Frame decoding (bytes → visitor callbacks)
//! - A resumable varint62 reader (RFC 9000 Section 16)
//! - A [`decode_settings`] helper for one-shot SETTINGS buffers
//!
//! It does NOT provide:
//! - QUIC transport or stream reassembly (you provide ordered bytes)
//! - QPACK header decompression (header blocks stay opaque)
//! - HTTP semantics or stream-type enforcement (your responsibility)
//!
//! # Use Cases
//!
//! - **HTTP/3 endpoints**: frame layer under a request/response engine
//! - **WebTransport servers**: stream preface detection and dispatch
//! - **Protocol tooling**: inspectors and fuzzers without async plumbing

pub mod frames;
pub mod h3_codec;
pub mod varint;

pub use frames::{
    frame_type, settings_id, AcceptChFrame, AcceptChOriginValuePair, CancelPushFrame, GoAwayFrame,
    MaxPushIdFrame, PrioritizedElementType, PriorityUpdateFrame, SettingsFrame,
};
pub use h3_codec::{
    decode_settings, DecoderError, DecoderOptions, H3FrameDecoder, H3FrameVisitor,
    MAX_BUFFERED_FRAME_PAYLOAD,
};
pub use varint::{Varint62Progress, Varint62Reader, VARINT62_MAX};
