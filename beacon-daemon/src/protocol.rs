use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{io_err, DaemonError};
use crate::host::HostEvent;
use crate::paths::socket_path;

/// JSON newline-delimited request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    pub cmd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<HostEvent>,
}

impl DaemonRequest {
    pub fn command(cmd: &str) -> Self {
        Self {
            cmd: cmd.to_string(),
            event: None,
        }
    }

    pub fn event(event: HostEvent) -> Self {
        Self {
            cmd: "event".to_string(),
            event: Some(event),
        }
    }
}

/// JSON newline-delimited response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DaemonResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// How many times `request_status` knocks before reporting the daemon absent.
const STATUS_ATTEMPTS: u32 = 5;
const STATUS_RETRY_DELAY: Duration = Duration::from_millis(100);

/// One request line out, one response line back.
pub fn send_request(home: &Path, request: &DaemonRequest) -> Result<DaemonResponse, DaemonError> {
    let socket = socket_path(home);
    let stream = connect(&socket)?;

    let mut line = serde_json::to_vec(request)?;
    line.push(b'\n');
    let mut writer = &stream;
    writer
        .write_all(&line)
        .and_then(|()| writer.flush())
        .map_err(|e| io_err(&socket, e))?;

    let mut reply = String::new();
    let read = BufReader::new(&stream)
        .read_line(&mut reply)
        .map_err(|e| io_err(&socket, e))?;
    if read == 0 {
        return Err(DaemonError::Protocol(format!(
            "beacon daemon hung up on '{}' without a reply",
            request.cmd
        )));
    }
    Ok(serde_json::from_str(reply.trim_end())?)
}

/// Connect to the daemon socket; a missing or dead socket means no daemon.
fn connect(socket: &Path) -> Result<UnixStream, DaemonError> {
    let not_running = || DaemonError::DaemonNotRunning {
        socket: socket.to_path_buf(),
    };
    if !socket.exists() {
        return Err(not_running());
    }
    UnixStream::connect(socket).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound
        | std::io::ErrorKind::ConnectionRefused
        | std::io::ErrorKind::ConnectionReset => not_running(),
        _ => io_err(socket, err),
    })
}

/// Daemon status payload. A daemon that was just spawned may not have bound
/// its socket yet, so absence is retried a few times.
pub fn request_status(home: &Path) -> Result<Value, DaemonError> {
    let request = DaemonRequest::command("status");
    let mut attempt = 1;
    loop {
        match send_request(home, &request) {
            Ok(response) => return response_into_data(response),
            Err(DaemonError::DaemonNotRunning { .. }) if attempt < STATUS_ATTEMPTS => {
                attempt += 1;
                sleep(STATUS_RETRY_DELAY);
            }
            Err(err) => return Err(err),
        }
    }
}

pub fn request_stop(home: &Path) -> Result<(), DaemonError> {
    let response = send_request(home, &DaemonRequest::command("stop"))?;
    response_into_data(response).map(|_| ())
}

/// Forward one host event and return the presenter's outcome.
pub fn send_event(home: &Path, event: HostEvent) -> Result<Value, DaemonError> {
    let response = send_request(home, &DaemonRequest::event(event))?;
    response_into_data(response)
}

fn response_into_data(response: DaemonResponse) -> Result<Value, DaemonError> {
    if response.ok {
        Ok(response.data.unwrap_or(Value::Null))
    } else {
        Err(DaemonError::Protocol(
            response
                .error
                .unwrap_or_else(|| "beacon daemon refused the request".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::ServiceState;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn event_request_serializes_tagged_event() {
        let request = DaemonRequest::event(HostEvent::StateChanged {
            state: ServiceState::Active,
        });
        let value = serde_json::to_value(&request).expect("encode");
        assert_eq!(
            value,
            json!({"cmd": "event", "event": {"event": "state_changed", "state": "active"}})
        );
    }

    #[test]
    fn plain_command_omits_event() {
        let line = serde_json::to_string(&DaemonRequest::command("status")).expect("encode");
        assert_eq!(line, r#"{"cmd":"status"}"#);
        let decoded: DaemonRequest = serde_json::from_str(&line).expect("decode");
        assert!(decoded.event.is_none());
    }

    #[test]
    fn error_response_becomes_protocol_error() {
        let err = response_into_data(DaemonResponse::error("boom")).unwrap_err();
        assert!(matches!(err, DaemonError::Protocol(ref msg) if msg == "boom"));
    }

    #[test]
    fn missing_socket_reports_not_running() {
        let home = TempDir::new().expect("home");
        let err = send_request(home.path(), &DaemonRequest::command("status")).unwrap_err();
        assert!(matches!(err, DaemonError::DaemonNotRunning { .. }));
    }

    #[test]
    fn status_gives_up_when_no_daemon_appears() {
        let home = TempDir::new().expect("home");
        let err = request_status(home.path()).unwrap_err();
        assert!(matches!(err, DaemonError::DaemonNotRunning { .. }));
    }

    #[test]
    fn silent_hangup_is_a_protocol_error() {
        let home = TempDir::new().expect("home");
        std::fs::create_dir_all(crate::paths::beacon_root(home.path())).expect("mkdir");
        let listener =
            std::os::unix::net::UnixListener::bind(socket_path(home.path())).expect("bind");
        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut line = String::new();
            BufReader::new(&stream).read_line(&mut line).expect("read");
            drop(stream);
        });

        let err = send_request(home.path(), &DaemonRequest::command("status")).unwrap_err();
        server.join().expect("server thread");
        assert!(
            matches!(err, DaemonError::Protocol(ref msg) if msg.contains("'status'")),
            "got: {err}"
        );
    }
}
