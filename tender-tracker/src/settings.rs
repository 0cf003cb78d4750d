use std::time::Duration;

use chrono_tz::Tz;
use config::{Config, File};
use serde::Deserialize;
use snafu::ResultExt;
use strum::{AsRefStr, Display, EnumString};
use tender_core::{GeoPoint, VesselId};

use crate::error::{Result, error::ConfigSnafu};

pub const DEFAULT_TICK_RATE_HZ: u32 = 30;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    Local,
    Development,
    Production,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub log_level: LogLevel,
    pub environment: Environment,
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,
    /// How long after its last fix a vessel keeps being extrapolated.
    #[serde(default, with = "humantime_serde")]
    pub stale_after: Option<Duration>,
    pub timezone: Tz,
    pub ship: VesselSettings,
    #[serde(default)]
    pub tenders: Vec<VesselSettings>,
    pub pier: Option<WaypointSettings>,
    pub pier_url: Option<String>,
    /// Absent in tests, where fixes are fed directly to the consumer.
    pub feed: Option<FeedSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VesselSettings {
    pub id: VesselId,
    pub name: String,
    /// Identifies the vessel in sensor readings of the polling backend.
    pub mmsi: Option<u32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WaypointSettings {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FeedSettings {
    Stream {
        url: String,
    },
    Polling {
        url: String,
        #[serde(default = "default_poll_interval", with = "humantime_serde")]
        interval: Duration,
    },
}

fn default_tick_rate_hz() -> u32 {
    DEFAULT_TICK_RATE_HZ
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(10)
}

impl Settings {
    pub fn new() -> Result<Self> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Environment::Test);

        Self::load(environment, "config")
    }

    /// Reads `{config_dir}/{environment}.yml`, an optional `.secret` sibling and
    /// `TENDER_TRACKER__*` environment variables, later sources taking precedence.
    pub fn load(environment: Environment, config_dir: &str) -> Result<Self> {
        let file = environment.as_ref().to_lowercase();

        Config::builder()
            .add_source(File::with_name(&format!("{config_dir}/{file}")).required(true))
            .add_source(File::with_name(&format!("{config_dir}/{file}.secret")).required(false))
            .add_source(config::Environment::with_prefix("TENDER_TRACKER").separator("__"))
            .set_override("environment", environment.as_ref())
            .context(ConfigSnafu)?
            .build()
            .context(ConfigSnafu)?
            .try_deserialize()
            .context(ConfigSnafu)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }

    /// The ship first, then the tenders in configured order.
    pub fn vessels(&self) -> impl Iterator<Item = &VesselSettings> {
        std::iter::once(&self.ship).chain(self.tenders.iter())
    }
}

impl WaypointSettings {
    pub fn position(&self) -> tender_core::CoreResult<GeoPoint> {
        GeoPoint::try_new(self.latitude, self.longitude)
    }
}
