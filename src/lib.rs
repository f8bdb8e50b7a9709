//! h3-wire: HTTP/3 control-stream framing and SETTINGS exchange
//!
//! This crate provides the framing sublayer of an HTTP-over-QUIC stack:
//! the length-delimited frame codec used on the control stream, the
//! SETTINGS collection, and the role-checked connection establishment
//! step with a one-shot "peer settings ready" signal.
//!
//! # Features
//!
//! - **QUIC varints**: RFC 9000 §16 variable-length integers for every
//!   type, length, and settings field
//! - **Type-dispatching parser**: reads `[type][length][payload]` frames,
//!   decodes SETTINGS structurally, and passes unknown/extension frames
//!   through opaquely
//! - **Bounded decoding**: per-frame (256 KiB) and per-SETTINGS (8 KiB)
//!   ceilings enforced before any payload allocation
//! - **Deterministic SETTINGS encoding**: identifiers sorted ascending,
//!   so equal mappings serialize to identical bytes
//! - **Readiness gate**: any number of tasks can await the peer's
//!   settings without blocking the frame-reading loop
//!
//! # Quick Start
//!
//! ```rust
//! use h3_wire::{decode_frame, Frame, Settings, SETTING_DATAGRAM};
//!
//! // Build and serialize a SETTINGS frame.
//! let mut settings = Settings::new();
//! settings.set(SETTING_DATAGRAM, 1);
//!
//! let mut buf = bytes::BytesMut::new();
//! settings.encode_frame(&mut buf);
//!
//! // Parse it back.
//! let mut wire = buf.freeze();
//! match decode_frame(&mut wire).unwrap() {
//!     Frame::Settings(decoded) => assert_eq!(decoded.get(SETTING_DATAGRAM), Some(1)),
//!     other => panic!("unexpected frame: {other:?}"),
//! }
//! ```
//!
//! # Architecture
//!
//! This crate is intentionally minimal. It provides:
//! - Varint and frame encoding/decoding
//! - The SETTINGS collection and its wire codec
//! - Connection establishment and the peer-settings gate
//!
//! It does NOT provide:
//! - QUIC itself (stream acceptance, flow control, encryption): you bring
//!   a session
//! - HTTP semantics (header compression, request/response mapping)
//! - Payload decoding for frame types other than SETTINGS; those are
//!   surfaced as opaque [`Frame::Unknown`] payloads for a higher layer
//!
//! Frame decoding on one stream is inherently sequential (boundaries are
//! only known by consuming the preceding frame), and every decode error
//! is connection-fatal: no resynchronization is attempted.

pub mod connection;
pub mod error;
pub mod frame;
pub mod settings;
pub mod varint;

pub use connection::{Connection, Perspective, Session};
pub use error::{Error, Result};
pub use frame::{decode_frame, read_frame, write_frame_header, Frame, FrameType, MAX_FRAME_SIZE};
pub use settings::{Settings, MAX_SETTINGS_SIZE, SETTING_DATAGRAM};
pub use varint::{varint_len, MAX_VARINT};
