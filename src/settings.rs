//! The SETTINGS frame: a duplicate-free identifier/value collection
//! exchanged once per connection direction (RFC 9114 §7.2.4).
//!
//! The payload is a flat sequence of `[identifier varint][value varint]`
//! pairs with no padding. Lookups are order-independent, but serialization
//! sorts identifiers ascending so that two encodings of the same logical
//! mapping are byte-identical.

use std::collections::HashMap;

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::frame::FrameType;
use crate::varint;

/// The datagram-support setting identifier. Value semantics (presence,
/// nonzero) are defined by the HTTP layer above, not here.
pub const SETTING_DATAGRAM: u64 = 0x276;

/// Maximum accepted SETTINGS frame body (8 KiB).
/// Prevents a peer from forcing a large allocation with a single frame.
pub const MAX_SETTINGS_SIZE: usize = 8 * 1024;

/// A SETTINGS collection, mapping identifiers to values.
///
/// Created empty for the local side and populated via [`set`] before the
/// connection sends it, or created by decoding one wire frame for the
/// remote side. Decoding rejects duplicate identifiers; local mutation is
/// unconstrained. Not internally synchronized; concurrent mutation of one
/// instance needs external coordination.
///
/// [`set`]: Settings::set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    entries: HashMap<u64, u64>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<u64> {
        self.entries.get(&id).copied()
    }

    /// Insert or overwrite a setting. Only decoding enforces duplicate
    /// rejection; local writes always win.
    pub fn set(&mut self, id: u64, value: u64) {
        self.entries.insert(id, value);
    }

    pub fn remove(&mut self, id: u64) -> Option<u64> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encoded payload size in bytes: the sum of the varint lengths of
    /// every identifier and value.
    pub fn payload_len(&self) -> u64 {
        self.entries
            .iter()
            .map(|(id, value)| (varint::varint_len(*id) + varint::varint_len(*value)) as u64)
            .sum()
    }

    /// Decode a complete SETTINGS frame body.
    ///
    /// `payload` must be exactly the declared frame body; the caller is
    /// responsible for the [`MAX_SETTINGS_SIZE`] ceiling and for reading
    /// exactly that many bytes off the stream. Decoding is all-or-nothing:
    /// a trailing partial pair or a repeated identifier rejects the whole
    /// frame.
    pub fn decode(payload: &[u8]) -> Result<Settings> {
        let mut buf = payload;
        let mut settings = Settings::new();
        while !buf.is_empty() {
            let id = decode_pair_varint(&mut buf)?;
            let value = decode_pair_varint(&mut buf)?;
            if settings.has(id) {
                return Err(Error::DuplicateSetting(id));
            }
            settings.set(id, value);
        }
        Ok(settings)
    }

    /// Serialize the full frame (type, length, payload) into `buf`.
    ///
    /// Identifiers are written in ascending order, so the output depends
    /// only on the logical mapping, not on insertion order.
    pub fn encode_frame(&self, buf: &mut BytesMut) {
        varint::encode(FrameType::Settings.code(), buf);
        varint::encode(self.payload_len(), buf);
        let mut ids: Vec<u64> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            varint::encode(id, buf);
            varint::encode(self.entries[&id], buf);
        }
    }

    /// Serialize the frame and write it to `writer`, flushing afterwards.
    pub async fn write_frame<W>(&self, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut buf = BytesMut::with_capacity(2 + self.payload_len() as usize);
        self.encode_frame(&mut buf);
        writer.write_all(&buf).await?;
        writer.flush().await?;
        Ok(())
    }
}

impl FromIterator<(u64, u64)> for Settings {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        Settings {
            entries: iter.into_iter().collect(),
        }
    }
}

// The body is size-exact, so running out of bytes mid-pair means the
// declared length itself was inconsistent with the pairs it framed.
fn decode_pair_varint(buf: &mut &[u8]) -> Result<u64> {
    varint::decode(buf).map_err(|err| match err {
        Error::TruncatedInput => Error::MalformedFrame("truncated setting pair"),
        other => other,
    })
}
