use dsec_core::Error;
use dsec_drpc::{Call, Connector, Response, ResponseStatus, Session, UnixConnector, MAX_REPLY_LEN};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;

/// Serve one connection, answering each call with `reply(call)`
///
/// A `None` from `reply` closes the connection without answering.
fn serve_one<F>(reply: F) -> (TempDir, PathBuf, JoinHandle<Vec<Call>>)
where
    F: Fn(&Call) -> Option<String> + Send + 'static,
{
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("peer.sock");
    let listener = UnixListener::bind(&path).unwrap();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut writer = stream;
        let mut seen = Vec::new();

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 {
                break;
            }
            let call: Call = serde_json::from_str(line.trim_end()).unwrap();
            let answer = reply(&call);
            seen.push(call);
            match answer {
                Some(text) => {
                    writer.write_all(text.as_bytes()).unwrap();
                    writer.write_all(b"\n").unwrap();
                }
                None => break,
            }
        }
        seen
    });

    (dir, path, handle)
}

fn echo(call: &Call) -> Option<String> {
    let mut body = call.body.clone();
    body.reverse();
    Some(serde_json::to_string(&Response::success(call.sequence, body)).unwrap())
}

#[test]
fn test_call_round_trip() {
    let (_dir, path, server) = serve_one(echo);

    let mut session = UnixConnector::new().connect(&path).unwrap();
    let call = Call::new(4, 401, vec![1, 2, 3]);
    let response = session.call(&call).unwrap().unwrap();
    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.body, vec![3, 2, 1]);

    let second = session.call(&Call::new(1, 101, Vec::new())).unwrap().unwrap();
    assert!(second.body.is_empty());

    drop(session);
    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], call);
    assert_eq!((seen[1].module, seen[1].method), (1, 101));
}

#[test]
fn test_missing_socket_is_connect_failed() {
    let dir = TempDir::new().unwrap();
    let result = UnixConnector::new().connect(&dir.path().join("absent.sock"));
    assert!(matches!(result, Err(Error::ConnectFailed { .. })));
}

#[test]
fn test_peer_hangup_is_no_reply() {
    let (_dir, path, server) = serve_one(|_| None);

    let mut session = UnixConnector::new().connect(&path).unwrap();
    let response = session.call(&Call::new(1, 101, Vec::new())).unwrap();
    assert!(response.is_none());

    drop(session);
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn test_garbage_reply_is_protocol_error() {
    let (_dir, path, _server) = serve_one(|_| Some("not json".to_string()));

    let mut session = UnixConnector::new().connect(&path).unwrap();
    let result = session.call(&Call::new(1, 101, Vec::new()));
    assert!(matches!(result, Err(Error::Protocol { .. })));
}

#[test]
fn test_sequence_mismatch_is_protocol_error() {
    let (_dir, path, _server) = serve_one(|call| {
        Some(serde_json::to_string(&Response::success(call.sequence + 1, Vec::new())).unwrap())
    });

    let mut session = UnixConnector::new().connect(&path).unwrap();
    let result = session.call(&Call::new(1, 101, Vec::new()));
    assert!(matches!(result, Err(Error::Protocol { .. })));
}

#[test]
fn test_oversized_reply_is_protocol_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flood.sock");
    let listener = UnixListener::bind(&path).unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut line = String::new();
        let _ = BufReader::new(&stream).read_line(&mut line);
        // The client hangs up part way through, so the write may fail
        let flood = vec![b'x'; MAX_REPLY_LEN as usize + 64];
        let _ = stream.write_all(&flood);
    });

    let mut session = UnixConnector::new().connect(&path).unwrap();
    let result = session.call(&Call::new(4, 401, Vec::new()));
    assert!(matches!(result, Err(Error::Protocol { .. })));
}

#[test]
fn test_silent_peer_times_out() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("silent.sock");
    let listener = UnixListener::bind(&path).unwrap();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut line = String::new();
        let _ = BufReader::new(&stream).read_line(&mut line);
        // Hold the connection open without replying until the client leaves
        let _ = BufReader::new(&stream).read_line(&mut line);
    });

    let connector = UnixConnector::with_timeout(Some(Duration::from_millis(100)));
    let mut session = connector.connect(&path).unwrap();
    let result = session.call(&Call::new(4, 401, vec![0]));
    assert!(matches!(result, Err(Error::Transport { .. })));

    drop(session);
    server.join().unwrap();
}
