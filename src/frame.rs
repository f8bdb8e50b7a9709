//! HTTP/3 frame model and the type-dispatching parser.
//!
//! Frames are TLV-encoded on the stream: `[type varint][length varint]
//! [payload]`. The parser reads one header, enforces the size ceiling
//! before allocating, and hands SETTINGS payloads to the structured
//! decoder; every other type is carried opaquely so callers can skip or
//! log it without understanding its semantics.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::error::{Error, Result};
use crate::settings::{Settings, MAX_SETTINGS_SIZE};
use crate::varint;

/// Maximum accepted body for any single frame (256 KiB).
/// Prevents a peer from declaring an unbounded length and forcing
/// unbounded buffering.
pub const MAX_FRAME_SIZE: usize = 256 * 1024;

/// An HTTP/3 frame type code (RFC 9114 §7.2, plus draft extensions).
///
/// Well-known codes form the closed set below; any other code is a valid
/// extension type and round-trips through [`Unknown`] unchanged.
///
/// [`Unknown`]: FrameType::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Data,
    Headers,
    CancelPush,
    Settings,
    PushPromise,
    GoAway,
    MaxPushId,
    DuplicatePush,
    Unknown(u64),
}

impl FrameType {
    pub const fn from_code(code: u64) -> Self {
        match code {
            0x0 => FrameType::Data,
            0x1 => FrameType::Headers,
            0x3 => FrameType::CancelPush,
            0x4 => FrameType::Settings,
            0x5 => FrameType::PushPromise,
            0x7 => FrameType::GoAway,
            0xd => FrameType::MaxPushId,
            0xe => FrameType::DuplicatePush,
            other => FrameType::Unknown(other),
        }
    }

    pub const fn code(self) -> u64 {
        match self {
            FrameType::Data => 0x0,
            FrameType::Headers => 0x1,
            FrameType::CancelPush => 0x3,
            FrameType::Settings => 0x4,
            FrameType::PushPromise => 0x5,
            FrameType::GoAway => 0x7,
            FrameType::MaxPushId => 0xd,
            FrameType::DuplicatePush => 0xe,
            FrameType::Unknown(code) => code,
        }
    }

    pub const fn is_well_known(self) -> bool {
        !matches!(self, FrameType::Unknown(_))
    }
}

/// Renders the IETF mnemonic, or `frame type 0x..` for extension codes.
impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameType::Data => f.write_str("DATA"),
            FrameType::Headers => f.write_str("HEADERS"),
            FrameType::CancelPush => f.write_str("CANCEL_PUSH"),
            FrameType::Settings => f.write_str("SETTINGS"),
            FrameType::PushPromise => f.write_str("PUSH_PROMISE"),
            FrameType::GoAway => f.write_str("GO_AWAY"),
            FrameType::MaxPushId => f.write_str("MAX_PUSH_ID"),
            FrameType::DuplicatePush => f.write_str("DUPLICATE_PUSH"),
            FrameType::Unknown(code) => write!(f, "frame type {code:#x}"),
        }
    }
}

/// A parsed frame off the control stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A decoded SETTINGS frame.
    Settings(Settings),
    /// Any frame the parser does not decode structurally, well-known or
    /// extension alike: the payload is read eagerly and kept opaque.
    /// Extension type codes round-trip through here unchanged.
    Unknown { frame_type: u64, payload: Bytes },
}

impl Frame {
    pub fn frame_type(&self) -> FrameType {
        match self {
            Frame::Settings(_) => FrameType::Settings,
            Frame::Unknown { frame_type, .. } => FrameType::from_code(*frame_type),
        }
    }

    /// Encoded payload length, or `None` for frame kinds whose payload is
    /// streamed and not precomputable. Both current variants know their
    /// length.
    pub fn payload_len(&self) -> Option<u64> {
        match self {
            Frame::Settings(settings) => Some(settings.payload_len()),
            Frame::Unknown { payload, .. } => Some(payload.len() as u64),
        }
    }

    /// Serialize the full frame (header and payload) into `buf`.
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            Frame::Settings(settings) => settings.encode_frame(buf),
            Frame::Unknown {
                frame_type,
                payload,
            } => {
                write_frame_header(buf, FrameType::from_code(*frame_type), self.payload_len());
                buf.put_slice(payload);
            }
        }
    }

    /// Serialize the frame and write it to `writer`, flushing afterwards.
    pub async fn write<W>(&self, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        writer.write_all(&buf).await?;
        writer.flush().await?;
        Ok(())
    }
}

/// Write a frame header: the type varint, then the length varint.
///
/// `payload_len` of `None` is the streaming sentinel: only the type varint
/// is written, and the caller appends payload bytes itself (DATA-style
/// frames). It must never be used for a length-prefixed frame kind.
pub fn write_frame_header(buf: &mut impl BufMut, frame_type: FrameType, payload_len: Option<u64>) {
    varint::encode(frame_type.code(), buf);
    if let Some(len) = payload_len {
        varint::encode(len, buf);
    }
}

/// Read one frame off an async stream.
///
/// On success the stream is positioned exactly at the end of the consumed
/// frame. On any error the position is undefined: the caller must treat
/// the connection as unusable and close it, since frame boundaries cannot
/// be recovered.
pub async fn read_frame<R>(reader: &mut R) -> Result<Frame>
where
    R: AsyncRead + Unpin,
{
    let (type_code, _) = varint::read(reader).await.map_err(header_error)?;
    let (len, _) = varint::read(reader).await.map_err(header_error)?;
    let frame_type = FrameType::from_code(type_code);
    trace!(%frame_type, len, "frame header");
    check_len(frame_type, len)?;

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    build_frame(type_code, payload.into())
}

/// Buffer-level counterpart of [`read_frame`] for callers that already
/// hold the bytes. `buf` must contain the complete frame; a frame
/// extending past its end is reported as [`Error::TruncatedInput`].
pub fn decode_frame(buf: &mut impl Buf) -> Result<Frame> {
    let type_code = varint::decode(buf).map_err(header_error)?;
    let len = varint::decode(buf).map_err(header_error)?;
    check_len(FrameType::from_code(type_code), len)?;

    if (buf.remaining() as u64) < len {
        return Err(Error::TruncatedInput);
    }
    let payload = buf.copy_to_bytes(len as usize);
    build_frame(type_code, payload)
}

// A truncation inside the type/length varints means the header itself is
// unparseable; past the header, truncation keeps its own error kind.
fn header_error(err: Error) -> Error {
    match err {
        Error::TruncatedInput => Error::MalformedFrame("truncated frame header"),
        other => other,
    }
}

fn check_len(frame_type: FrameType, len: u64) -> Result<()> {
    if len > MAX_FRAME_SIZE as u64 {
        return Err(Error::FrameTooLarge {
            len,
            max: MAX_FRAME_SIZE as u64,
        });
    }
    // The SETTINGS ceiling is checked before any payload byte is read.
    if frame_type == FrameType::Settings && len > MAX_SETTINGS_SIZE as u64 {
        return Err(Error::SettingsTooLarge {
            len,
            max: MAX_SETTINGS_SIZE as u64,
        });
    }
    Ok(())
}

fn build_frame(type_code: u64, payload: Bytes) -> Result<Frame> {
    match FrameType::from_code(type_code) {
        FrameType::Settings => Ok(Frame::Settings(Settings::decode(&payload)?)),
        _ => Ok(Frame::Unknown {
            frame_type: type_code,
            payload,
        }),
    }
}
