//! QUIC variable-length integer encoding (RFC 9000 §16).
//!
//! Every frame type, frame length, and SETTINGS identifier/value on the
//! wire uses this encoding. The two most significant bits of the first
//! byte select the total length:
//!
//! | 2MSB | Length  | Usable Bits | Range                 |
//! |------|---------|-------------|-----------------------|
//! | 00   | 1 byte  | 6           | 0–63                  |
//! | 01   | 2 bytes | 14          | 0–16383               |
//! | 10   | 4 bytes | 30          | 0–1073741823          |
//! | 11   | 8 bytes | 62          | 0–4611686018427387903 |

use bytes::{Buf, BufMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

/// Maximum value representable as a QUIC varint (2^62 - 1).
pub const MAX_VARINT: u64 = (1 << 62) - 1;

/// How many bytes `encode` emits for `value`.
pub const fn varint_len(value: u64) -> usize {
    if value <= 63 {
        1
    } else if value <= 16383 {
        2
    } else if value <= 1_073_741_823 {
        4
    } else {
        8
    }
}

/// Append the minimal-length encoding of `value` to `buf`.
///
/// # Panics
///
/// Panics if `value` exceeds [`MAX_VARINT`]. Values decoded off the wire
/// are in range by construction; only locally supplied identifiers and
/// values can trip this.
pub fn encode(value: u64, buf: &mut impl BufMut) {
    assert!(value <= MAX_VARINT, "value {value} exceeds the varint range");
    match varint_len(value) {
        1 => buf.put_u8(value as u8),
        2 => buf.put_u16(value as u16 | 0x4000),
        4 => buf.put_u32(value as u32 | 0x8000_0000),
        _ => buf.put_u64(value | 0xc000_0000_0000_0000),
    }
}

/// Decode one varint from the front of `buf`, consuming it.
///
/// Fails with [`Error::TruncatedInput`] if `buf` ends mid-encoding.
pub fn decode(buf: &mut impl Buf) -> Result<u64> {
    if !buf.has_remaining() {
        return Err(Error::TruncatedInput);
    }
    let first = buf.get_u8();
    let len = 1usize << (first >> 6);
    if buf.remaining() < len - 1 {
        return Err(Error::TruncatedInput);
    }
    let mut value = u64::from(first & 0x3f);
    for _ in 1..len {
        value = (value << 8) | u64::from(buf.get_u8());
    }
    Ok(value)
}

/// Read one varint off an async stream.
///
/// Returns `(value, bytes_consumed)`. Fails with [`Error::TruncatedInput`]
/// if the stream ends before the encoding is complete.
pub async fn read<R>(reader: &mut R) -> Result<(u64, usize)>
where
    R: AsyncRead + Unpin,
{
    let first = reader.read_u8().await?;
    let len = 1usize << (first >> 6);
    let mut rest = [0u8; 7];
    reader.read_exact(&mut rest[..len - 1]).await?;
    let mut value = u64::from(first & 0x3f);
    for byte in &rest[..len - 1] {
        value = (value << 8) | u64::from(*byte);
    }
    Ok((value, len))
}
