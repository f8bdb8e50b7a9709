//! Tests for the SETTINGS frame codec

use bytes::{BufMut, BytesMut};
use h3_wire::{
    read_frame, varint, Error, Frame, Settings, MAX_SETTINGS_SIZE, SETTING_DATAGRAM,
};

async fn roundtrip(settings: &Settings) -> Settings {
    let mut wire = Vec::new();
    settings.write_frame(&mut wire).await.unwrap();

    let mut input: &[u8] = &wire[..];
    let frame = read_frame(&mut input).await.unwrap();
    assert!(input.is_empty(), "roundtrip must consume the whole frame");

    match frame {
        Frame::Settings(decoded) => decoded,
        other => panic!("expected SETTINGS, got {other:?}"),
    }
}

#[tokio::test]
async fn test_roundtrip_preserves_every_entry() {
    let settings: Settings = [
        (0x1, 0),
        (0x6, 16384),
        (SETTING_DATAGRAM, 1),
        (0x3fff_ffff, u32::MAX as u64),
    ]
    .into_iter()
    .collect();

    let decoded = roundtrip(&settings).await;
    assert_eq!(decoded.len(), settings.len());
    for id in [0x1, 0x6, SETTING_DATAGRAM, 0x3fff_ffff] {
        assert!(decoded.has(id));
        assert_eq!(decoded.get(id), settings.get(id));
    }
    assert_eq!(decoded, settings);
}

#[tokio::test]
async fn test_roundtrip_empty_settings() {
    let decoded = roundtrip(&Settings::new()).await;
    assert!(decoded.is_empty());
}

#[test]
fn test_encoding_is_deterministic_across_insertion_orders() {
    let mut forward = Settings::new();
    forward.set(0x1, 100);
    forward.set(0x6, 200);
    forward.set(SETTING_DATAGRAM, 1);

    let mut backward = Settings::new();
    backward.set(SETTING_DATAGRAM, 1);
    backward.set(0x6, 200);
    backward.set(0x1, 100);

    let mut first = BytesMut::new();
    forward.encode_frame(&mut first);
    let mut second = BytesMut::new();
    backward.encode_frame(&mut second);
    assert_eq!(first, second);

    // Repeated encoding of the same instance is also byte-stable.
    let mut again = BytesMut::new();
    forward.encode_frame(&mut again);
    assert_eq!(first, again);
}

#[test]
fn test_identifiers_written_in_ascending_order() {
    let mut settings = Settings::new();
    settings.set(SETTING_DATAGRAM, 1);
    settings.set(0x1, 7);
    settings.set(0x40, 9);

    let mut buf = BytesMut::new();
    settings.encode_frame(&mut buf);

    let mut slice = &buf[..];
    varint::decode(&mut slice).unwrap(); // type
    varint::decode(&mut slice).unwrap(); // length

    let mut ids = Vec::new();
    while !slice.is_empty() {
        ids.push(varint::decode(&mut slice).unwrap());
        varint::decode(&mut slice).unwrap(); // value
    }
    assert_eq!(ids, vec![0x1, 0x40, SETTING_DATAGRAM]);
}

#[tokio::test]
async fn test_duplicate_identifier_rejects_whole_frame() {
    let mut payload = BytesMut::new();
    varint::encode(0x6, &mut payload);
    varint::encode(1, &mut payload);
    varint::encode(0x6, &mut payload);
    varint::encode(2, &mut payload);

    let mut buf = BytesMut::new();
    varint::encode(0x4, &mut buf);
    varint::encode(payload.len() as u64, &mut buf);
    buf.put_slice(&payload);

    let mut input: &[u8] = &buf[..];
    let err = read_frame(&mut input).await.unwrap_err();
    assert!(matches!(err, Error::DuplicateSetting(0x6)));
}

#[tokio::test]
async fn test_oversized_settings_rejected_before_payload_read() {
    // Header declares 8193 bytes, and the stream carries none of them: the
    // ceiling check must fire before any payload read is attempted.
    let mut buf = BytesMut::new();
    varint::encode(0x4, &mut buf);
    varint::encode(MAX_SETTINGS_SIZE as u64 + 1, &mut buf);

    let mut input: &[u8] = &buf[..];
    let err = read_frame(&mut input).await.unwrap_err();
    match err {
        Error::SettingsTooLarge { len, max } => {
            assert_eq!(len, MAX_SETTINGS_SIZE as u64 + 1);
            assert_eq!(max, MAX_SETTINGS_SIZE as u64);
        }
        other => panic!("expected SettingsTooLarge, got {other:?}"),
    }
}

#[tokio::test]
async fn test_settings_at_exact_ceiling_accepted() {
    // 2048 pairs of a 2-byte identifier and a 2-byte value: 8192 bytes.
    let mut settings = Settings::new();
    for id in 64..(64 + 2048) {
        settings.set(id, 64);
    }
    assert_eq!(settings.payload_len(), MAX_SETTINGS_SIZE as u64);

    let decoded = roundtrip(&settings).await;
    assert_eq!(decoded.len(), 2048);
}

#[tokio::test]
async fn test_inconsistent_declared_length_is_malformed() {
    // The declared length covers an identifier but cuts its value off.
    let mut buf = BytesMut::new();
    varint::encode(0x4, &mut buf);
    varint::encode(1, &mut buf);
    varint::encode(0x6, &mut buf); // one byte of payload, no value

    let mut input: &[u8] = &buf[..];
    let err = read_frame(&mut input).await.unwrap_err();
    assert!(matches!(err, Error::MalformedFrame(_)));
}
