//! Error taxonomy for the framing layer.
//!
//! Every decode error here is connection-fatal by convention: frame
//! boundaries cannot be re-established after a corrupted header, so callers
//! are expected to tear the connection down rather than retry.

use std::io;

use crate::connection::Perspective;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The wrong establishment entry point was called for the session's
    /// role: `accept` on a client session, or `open` on a server session.
    #[error("{expected}-side API called on a {actual} session")]
    RoleMismatch {
        expected: Perspective,
        actual: Perspective,
    },

    /// A frame header or payload could not be parsed. The stream position
    /// is no longer trustworthy.
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    /// A frame declared a length above [`MAX_FRAME_SIZE`].
    ///
    /// [`MAX_FRAME_SIZE`]: crate::frame::MAX_FRAME_SIZE
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: u64, max: u64 },

    /// A SETTINGS frame declared a length above [`MAX_SETTINGS_SIZE`].
    ///
    /// [`MAX_SETTINGS_SIZE`]: crate::settings::MAX_SETTINGS_SIZE
    #[error("SETTINGS frame of {len} bytes exceeds the {max} byte limit")]
    SettingsTooLarge { len: u64, max: u64 },

    /// A SETTINGS frame carried the same identifier twice. The whole frame
    /// is rejected; no partial collection is applied.
    #[error("duplicate setting identifier {0:#x}")]
    DuplicateSetting(u64),

    /// The stream ended before a complete value could be read.
    #[error("stream ended before a complete value could be read")]
    TruncatedInput,

    /// An I/O error other than early end-of-stream.
    #[error("i/o error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        // A short read inside a framed value is a truncation of the frame,
        // whatever the transport called it.
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::TruncatedInput
        } else {
            Error::Io(err)
        }
    }
}
