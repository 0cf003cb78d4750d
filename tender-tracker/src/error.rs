use reqwest::StatusCode;
use snafu::{Location, Snafu};
use tokio::task::JoinError;
use tokio_util::codec::LinesCodecError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to load configuration"))]
    Config {
        #[snafu(implicit)]
        location: Location,
        source: config::ConfigError,
    },
    #[snafu(display("Failed to send request"))]
    Request {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },
    #[snafu(display(
        "Non-ok response received from server, url: '{url}', status: '{status}', body: '{body}'"
    ))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: String,
        status: StatusCode,
        body: String,
    },
    #[snafu(display("Failed to deserialize payload"))]
    Json {
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
    #[snafu(display("Failed to read from the fix stream"))]
    Lines {
        #[snafu(implicit)]
        location: Location,
        source: LinesCodecError,
    },
    #[snafu(display("Fix stream closed unexpectedly"))]
    StreamClosed {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("A core operation failed"))]
    Core {
        #[snafu(implicit)]
        location: Location,
        source: tender_core::Error,
    },
    #[snafu(display("Failed to join tasks"))]
    JoinError {
        #[snafu(implicit)]
        location: Location,
        source: JoinError,
    },
}
