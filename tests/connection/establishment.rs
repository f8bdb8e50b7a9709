//! Tests for role-checked connection establishment

use h3_wire::{Connection, Error, Perspective, Session, Settings};

#[derive(Debug)]
struct FakeSession {
    perspective: Perspective,
}

impl FakeSession {
    fn client() -> Self {
        Self {
            perspective: Perspective::Client,
        }
    }

    fn server() -> Self {
        Self {
            perspective: Perspective::Server,
        }
    }
}

impl Session for FakeSession {
    fn perspective(&self) -> Perspective {
        self.perspective
    }
}

#[test]
fn test_accept_requires_server_session() {
    let err = Connection::accept(FakeSession::client(), Settings::new()).unwrap_err();
    match err {
        Error::RoleMismatch { expected, actual } => {
            assert_eq!(expected, Perspective::Server);
            assert_eq!(actual, Perspective::Client);
        }
        other => panic!("expected RoleMismatch, got {other:?}"),
    }
}

#[test]
fn test_open_requires_client_session() {
    let err = Connection::open(FakeSession::server(), Settings::new()).unwrap_err();
    match err {
        Error::RoleMismatch { expected, actual } => {
            assert_eq!(expected, Perspective::Client);
            assert_eq!(actual, Perspective::Server);
        }
        other => panic!("expected RoleMismatch, got {other:?}"),
    }
}

#[test]
fn test_accept_on_server_session_succeeds() {
    let mut settings = Settings::new();
    settings.set(0x6, 4096);

    let conn = Connection::accept(FakeSession::server(), settings).unwrap();
    assert_eq!(conn.session().perspective(), Perspective::Server);
    assert_eq!(conn.settings().get(0x6), Some(4096));
    assert!(conn.peer_settings().is_none());
}

#[test]
fn test_open_on_client_session_succeeds() {
    let conn = Connection::open(FakeSession::client(), Settings::new()).unwrap();
    assert_eq!(conn.session().perspective(), Perspective::Client);
    assert!(conn.peer_settings().is_none());
}

#[test]
fn test_local_settings_can_be_populated_after_construction() {
    let mut conn = Connection::open(FakeSession::client(), Settings::new()).unwrap();
    conn.settings_mut().set(0x33, 9);
    assert_eq!(conn.settings().get(0x33), Some(9));
}
