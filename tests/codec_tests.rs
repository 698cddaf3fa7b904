//! Codec Tests
//!
//! Tests for command and response encoding/decoding.

use std::io::Cursor;

use bytes::Bytes;
use seqlog::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, CommandType, Response, Status,
    HEADER_SIZE, MAX_PAYLOAD_SIZE, MAX_VALUE_SIZE, RECORD_OVERHEAD,
};
use seqlog::{Record, SeqlogError};

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_produce() {
    let cmd = Command::Produce {
        value: Bytes::from_static(b"hello"),
    };
    let encoded = encode_command(&cmd);
    let decoded = decode_command(&encoded).unwrap();

    assert_eq!(decoded, cmd);
}

#[test]
fn test_encode_decode_consume() {
    let cmd = Command::Consume { offset: 1234 };
    let encoded = encode_command(&cmd);
    let decoded = decode_command(&encoded).unwrap();

    assert_eq!(decoded, Command::Consume { offset: 1234 });
}

#[test]
fn test_produce_wire_layout() {
    let encoded = encode_command(&Command::Produce {
        value: Bytes::from_static(b"abc"),
    });

    assert_eq!(encoded[0], CommandType::Produce as u8);
    assert_eq!(&encoded[1..HEADER_SIZE], &3u32.to_be_bytes());
    assert_eq!(&encoded[HEADER_SIZE..], b"abc");
}

#[test]
fn test_consume_offset_is_big_endian() {
    let encoded = encode_command(&Command::Consume { offset: 1 });

    assert_eq!(encoded.len(), HEADER_SIZE + 8);
    assert_eq!(&encoded[HEADER_SIZE..], &[0u8, 0, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn test_encode_decode_ping() {
    let encoded = encode_command(&Command::Ping);

    assert_eq!(encoded.len(), HEADER_SIZE);
    assert_eq!(decode_command(&encoded).unwrap(), Command::Ping);
}

#[test]
fn test_produce_with_empty_value() {
    let cmd = Command::Produce { value: Bytes::new() };
    let decoded = decode_command(&encode_command(&cmd)).unwrap();

    assert_eq!(decoded, cmd);
}

// =============================================================================
// Malformed Command Tests
// =============================================================================

#[test]
fn test_decode_incomplete_header() {
    let err = decode_command(&[0x01, 0x00]).unwrap_err();

    assert!(matches!(err, SeqlogError::Protocol(_)));
}

#[test]
fn test_decode_incomplete_payload() {
    let mut encoded = encode_command(&Command::Produce {
        value: Bytes::from_static(b"truncated"),
    });
    encoded.truncate(encoded.len() - 3);

    assert!(matches!(
        decode_command(&encoded).unwrap_err(),
        SeqlogError::Protocol(_)
    ));
}

#[test]
fn test_decode_unknown_command() {
    let err = decode_command(&[0x7f, 0, 0, 0, 0]).unwrap_err();

    match err {
        SeqlogError::Protocol(msg) => assert!(msg.contains("0x7f")),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_decode_consume_with_short_offset() {
    let bytes = [CommandType::Consume as u8, 0, 0, 0, 4, 0, 0, 0, 1];

    assert!(matches!(
        decode_command(&bytes).unwrap_err(),
        SeqlogError::Protocol(_)
    ));
}

#[test]
fn test_decode_ping_with_payload() {
    let bytes = [CommandType::Ping as u8, 0, 0, 0, 1, 0xaa];

    assert!(matches!(
        decode_command(&bytes).unwrap_err(),
        SeqlogError::Protocol(_)
    ));
}

#[test]
fn test_decode_oversized_payload() {
    let mut bytes = vec![CommandType::Produce as u8];
    bytes.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());

    assert!(matches!(
        decode_command(&bytes).unwrap_err(),
        SeqlogError::Protocol(_)
    ));
}

#[test]
fn test_decode_produce_at_value_limit() {
    let cmd = Command::Produce {
        value: Bytes::from(vec![1u8; MAX_VALUE_SIZE]),
    };

    assert_eq!(decode_command(&encode_command(&cmd)).unwrap(), cmd);
}

#[test]
fn test_decode_produce_over_value_limit() {
    let cmd = Command::Produce {
        value: Bytes::from(vec![1u8; MAX_VALUE_SIZE + 1]),
    };

    match decode_command(&encode_command(&cmd)).unwrap_err() {
        SeqlogError::Protocol(msg) => assert!(msg.contains("too large")),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_largest_record_fits_in_one_response_frame() {
    let mut record = Record::new(vec![0u8; MAX_VALUE_SIZE]);
    record.offset = u64::MAX;

    let payload = record.to_bytes().unwrap();

    assert_eq!(payload.len(), MAX_VALUE_SIZE + RECORD_OVERHEAD);
    assert_eq!(payload.len(), MAX_PAYLOAD_SIZE as usize);

    let encoded = encode_response(&Response::ok(Some(payload)));
    assert_eq!(decode_response(&encoded).unwrap().status, Status::Ok);
}

// =============================================================================
// Response Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_offset_response() {
    let response = Response::offset(7);
    let decoded = decode_response(&encode_response(&response)).unwrap();

    assert_eq!(decoded.status, Status::Ok);
    assert_eq!(decoded.payload, Some(7u64.to_be_bytes().to_vec()));
}

#[test]
fn test_encode_decode_not_found() {
    let decoded = decode_response(&encode_response(&Response::not_found())).unwrap();

    assert_eq!(decoded.status, Status::NotFound);
    assert_eq!(decoded.payload, None);
}

#[test]
fn test_encode_decode_error_message() {
    let decoded = decode_response(&encode_response(&Response::error("log is full"))).unwrap();

    assert_eq!(decoded.status, Status::Error);
    assert_eq!(decoded.message(), "log is full");
}

#[test]
fn test_encode_decode_bad_request() {
    let decoded = decode_response(&encode_response(&Response::bad_request("bad frame"))).unwrap();

    assert_eq!(decoded.status, Status::BadRequest);
    assert_eq!(decoded.message(), "bad frame");
}

#[test]
fn test_decode_unknown_status() {
    let err = decode_response(&[0x09, 0, 0, 0, 0]).unwrap_err();

    assert!(matches!(err, SeqlogError::Protocol(_)));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_multiple_commands() {
    let commands = vec![
        Command::Produce {
            value: Bytes::from_static(b"one"),
        },
        Command::Consume { offset: 0 },
        Command::Ping,
    ];

    let mut buffer = Vec::new();
    for cmd in &commands {
        write_command(&mut buffer, cmd).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &commands {
        assert_eq!(&read_command(&mut cursor).unwrap(), expected);
    }

    // Stream exhausted
    match read_command(&mut cursor).unwrap_err() {
        SeqlogError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected EOF, got {:?}", other),
    }
}

#[test]
fn test_stream_response() {
    let mut buffer = Vec::new();
    write_response(&mut buffer, &Response::offset(3)).unwrap();
    write_response(&mut buffer, &Response::not_found()).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_response(&mut cursor).unwrap(), Response::offset(3));
    assert_eq!(read_response(&mut cursor).unwrap().status, Status::NotFound);
}

#[test]
fn test_stream_rejects_oversized_frame_without_reading_payload() {
    let mut bytes = vec![CommandType::Produce as u8];
    bytes.extend_from_slice(&u32::MAX.to_be_bytes());

    let mut cursor = Cursor::new(bytes);

    assert!(matches!(
        read_command(&mut cursor).unwrap_err(),
        SeqlogError::Protocol(_)
    ));
    assert_eq!(cursor.position() as usize, HEADER_SIZE);
}
