use chrono::Utc;
use futures::StreamExt;
use snafu::ResultExt;
use tender_core::{VesselFix, VesselId};
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{instrument, warn};

use crate::{
    error::{
        Result,
        error::{CoreSnafu, JsonSnafu, LinesSnafu, StreamClosedSnafu},
    },
    hub::FixHub,
    models::FixRecord,
};

const MAX_LINE_LENGTH: usize = 1000;

/// Reads newline delimited [`FixRecord`]s and publishes them to the hub.
///
/// A record that fails to parse or validate is skipped, the stream itself is only abandoned
/// on an I/O error.
#[derive(Debug, Default)]
pub struct Consumer;

impl Consumer {
    pub fn new() -> Consumer {
        Consumer
    }

    #[instrument(skip_all)]
    pub async fn run(&self, source: impl AsyncRead + Unpin, hub: &FixHub) -> Result<()> {
        let codec = LinesCodec::new_with_max_length(MAX_LINE_LENGTH);
        let mut framed_read = FramedRead::new(source, codec);

        while let Some(line) = framed_read.next().await {
            match line {
                Ok(line) => process_line(&line, hub),
                Err(e @ LinesCodecError::MaxLineLengthExceeded) => {
                    warn!("skipping oversized fix record: {e:?}")
                }
                Err(e) => return Err(e).context(LinesSnafu),
            }
        }

        StreamClosedSnafu.fail()
    }
}

fn process_line(line: &str, hub: &FixHub) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let (vessel, fix) = match parse_line(line) {
        Ok(v) => v,
        Err(e) => {
            warn!("skipping malformed fix record: {e:?}");
            return;
        }
    };

    if let Err(e) = hub.publish(&vessel, fix) {
        warn!("skipping fix record: {e:?}");
    }
}

fn parse_line(line: &str) -> Result<(VesselId, VesselFix)> {
    let record: FixRecord = serde_json::from_str(line).context(JsonSnafu)?;
    record.into_fix(Utc::now()).context(CoreSnafu)
}
