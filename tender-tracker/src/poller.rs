use std::{collections::HashMap, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde_json::{Map, Value};
use snafu::ResultExt;
use tender_core::VesselId;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, instrument, warn};

use crate::{
    error::{
        Result,
        error::{CoreSnafu, FailedRequestSnafu, RequestSnafu},
    },
    hub::FixHub,
    models::SensorReading,
};

/// Client of the sensor backend, which returns the latest readings keyed by sensor name.
pub struct SensorClient {
    url: String,
    client: Client,
}

impl SensorClient {
    pub fn new(url: String) -> SensorClient {
        SensorClient {
            url,
            client: Client::new(),
        }
    }

    /// Every value that parses as a [`SensorReading`], in key order.
    pub async fn readings(&self) -> Result<Vec<SensorReading>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context(RequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return FailedRequestSnafu {
                url: self.url.clone(),
                status,
                body: response.text().await.context(RequestSnafu)?,
            }
            .fail();
        }

        let readings: Map<String, Value> = response.json().await.context(RequestSnafu)?;

        Ok(readings
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(reading) => Some(reading),
                Err(e) => {
                    debug!(%key, "ignoring non-position reading: {e:?}");
                    None
                }
            })
            .collect())
    }
}

/// Polls the sensor backend and publishes the reading of each configured vessel.
pub struct Poller {
    client: SensorClient,
    interval: Duration,
    vessels: Vec<(u32, VesselId)>,
    last_published: HashMap<VesselId, SensorReading>,
}

impl Poller {
    pub fn new(client: SensorClient, interval: Duration, vessels: Vec<(u32, VesselId)>) -> Poller {
        Poller {
            client,
            interval,
            vessels,
            last_published: HashMap::new(),
        }
    }

    pub async fn run(mut self, hub: &FixHub) -> ! {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.poll_once(hub).await {
                error!("failed to poll sensor readings: {e:?}");
            }
        }
    }

    /// Publishes readings that changed since the previous poll, returning how many were
    /// published.
    ///
    /// An unchanged reading is not republished, it would re-base the extrapolation on a fix
    /// the marker has already moved past.
    #[instrument(skip_all, fields(app.num_fixes))]
    pub async fn poll_once(&mut self, hub: &FixHub) -> Result<usize> {
        let readings = self.client.readings().await?;
        let now = Utc::now();

        let mut num_fixes = 0;
        for (mmsi, vessel) in &self.vessels {
            let Some(reading) = readings
                .iter()
                .find(|r| r.user_id == Some(*mmsi) && r.has_position())
            else {
                debug!(%vessel, mmsi, "no reading for vessel");
                continue;
            };

            if self.last_published.get(vessel) == Some(reading) {
                continue;
            }

            match reading.to_fix(now) {
                Ok(fix) => {
                    hub.publish(vessel, fix).context(CoreSnafu)?;
                    self.last_published.insert(vessel.clone(), reading.clone());
                    num_fixes += 1;
                }
                Err(e) => warn!(%vessel, "skipping invalid sensor reading: {e:?}"),
            }
        }

        tracing::Span::current().record("app.num_fixes", num_fixes);

        Ok(num_fixes)
    }
}
