//! Host daemon: owns one presenter, feeds it service events, serves status.

mod error;
pub mod host;
pub mod paths;
pub mod protocol;
mod runtime;

pub use error::DaemonError;
pub use host::{load_resolver, HostEvent, PresenterHost, DEFAULT_API_LEVEL};
pub use protocol::{
    request_status, request_stop, send_event, send_request, DaemonRequest, DaemonResponse,
};
pub use runtime::{run, start_blocking};
