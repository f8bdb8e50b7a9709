//! Connection establishment over a QUIC session.
//!
//! The two entry points are role-checked: [`Connection::accept`] requires
//! a server-perspective session and [`Connection::open`] a client one. A
//! connection owns its session handle and its local [`Settings`], and
//! exposes a one-shot readiness gate for the peer's settings: the gate
//! opens exactly once, when the first SETTINGS frame is decoded off the
//! control stream (or immediately, for [`Connection::restored`]), and any
//! number of tasks may wait on it concurrently.

use std::fmt;

use tokio::sync::watch;
use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Which end of the connection a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    Client,
    Server,
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Perspective::Client => f.write_str("client"),
            Perspective::Server => f.write_str("server"),
        }
    }
}

/// The capability this layer consumes from the QUIC transport: report
/// which role the session plays. Stream acceptance, flow control, and
/// encryption stay behind the transport's own API.
pub trait Session {
    fn perspective(&self) -> Perspective;
}

/// An established HTTP/3 connection: the session handle, the local
/// settings, and the peer-settings gate.
pub struct Connection<S> {
    session: S,
    settings: Settings,
    peer_settings_tx: watch::Sender<Option<Settings>>,
    peer_settings_rx: watch::Receiver<Option<Settings>>,
}

impl<S: Session> Connection<S> {
    /// Establish the server side of a connection.
    ///
    /// Fails with [`Error::RoleMismatch`] if `session` reports the client
    /// perspective; no partial connection is returned.
    pub fn accept(session: S, settings: Settings) -> Result<Self> {
        match session.perspective() {
            Perspective::Server => Ok(Self::new(session, settings, None)),
            actual => Err(Error::RoleMismatch {
                expected: Perspective::Server,
                actual,
            }),
        }
    }

    /// Establish the client side of a connection; symmetric to
    /// [`Connection::accept`].
    pub fn open(session: S, settings: Settings) -> Result<Self> {
        match session.perspective() {
            Perspective::Client => Ok(Self::new(session, settings, None)),
            actual => Err(Error::RoleMismatch {
                expected: Perspective::Client,
                actual,
            }),
        }
    }

    /// Construct a connection whose peer settings are already known, e.g.
    /// when resuming from a cached session. The readiness gate is open
    /// from the start.
    pub fn restored(session: S, settings: Settings, peer_settings: Settings) -> Self {
        Self::new(session, settings, Some(peer_settings))
    }

    fn new(session: S, settings: Settings, peer_settings: Option<Settings>) -> Self {
        let (peer_settings_tx, peer_settings_rx) = watch::channel(peer_settings);
        Self {
            session,
            settings,
            peer_settings_tx,
            peer_settings_rx,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// The local settings, as sent (or to be sent) to the peer.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access for populating the local settings before they are
    /// written to the control stream.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Store the peer's decoded settings and open the readiness gate.
    ///
    /// Called by the read loop after the first SETTINGS frame decodes
    /// successfully. The gate opens at most once: on an already-open gate
    /// this is a no-op and the stored collection is kept, leaving a
    /// repeated SETTINGS frame for the read loop to reject at its own
    /// layer.
    pub fn on_peer_settings(&self, peer_settings: Settings) {
        let opened = self.peer_settings_tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(peer_settings);
            true
        });
        if opened {
            debug!("peer settings received");
        }
    }

    /// Non-blocking snapshot of the peer settings, if they have arrived.
    pub fn peer_settings(&self) -> Option<Settings> {
        self.peer_settings_rx.borrow().clone()
    }

    /// Wait until the peer's settings are known, then return them.
    ///
    /// Returns immediately if the gate is already open. Any number of
    /// tasks may wait concurrently, whether they started before or after
    /// the gate opened; all of them observe the same fully decoded
    /// collection. Waiting never blocks the read loop; the loop only
    /// ever *opens* the gate via [`Connection::on_peer_settings`].
    pub async fn wait_peer_settings(&self) -> Settings {
        let mut rx = self.peer_settings_rx.clone();
        let slot = rx
            .wait_for(Option::is_some)
            .await
            .expect("gate sender lives as long as the connection");
        slot.clone().expect("gate only opens once settings are stored")
    }
}

impl<S: fmt::Debug> fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("session", &self.session)
            .field("settings", &self.settings)
            .field("peer_settings", &*self.peer_settings_rx.borrow())
            .finish()
    }
}
