#![deny(rust_2018_idioms)]

use config::{Config, File};
use tender_tracker::{
    error::Error,
    settings::{Environment, FeedSettings, Settings},
};

pub mod helper;
pub mod http;

fn load(file: &str, environment: &str) -> Settings {
    Config::builder()
        .add_source(File::with_name(file).required(true))
        .set_override("environment", environment)
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap()
}

#[test]
fn test_local_settings_are_valid() {
    let settings = load("config/local.yml", "Local");
    assert!(settings.pier.unwrap().position().is_ok());
    assert!(matches!(settings.feed, Some(FeedSettings::Stream { .. })));
    assert_eq!(settings.stale_after, Some(std::time::Duration::from_secs(120)));
}

#[test]
fn test_production_settings_are_valid() {
    let settings = load("config/production.yml", "Production");
    assert!(settings.pier_url.is_some());
    assert!(settings.vessels().all(|v| v.mmsi.is_some()));
    match settings.feed {
        Some(FeedSettings::Polling { interval, .. }) => {
            assert_eq!(interval, std::time::Duration::from_secs(10))
        }
        v => panic!("unexpected feed: {v:?}"),
    }
}

#[test]
fn test_test_settings_are_valid() {
    let settings = load("config/test.yml", "Test");
    assert!(settings.feed.is_none());
    assert_eq!(settings.stale_after, None);
    assert_eq!(settings.vessels().count(), 3);
}

#[test]
fn test_settings_load_from_environment_file() {
    let settings = Settings::load(Environment::Test, "config").unwrap();
    assert_eq!(settings.environment, Environment::Test);
    assert_eq!(settings.ship.name, "Evrima");
}

#[test]
fn test_missing_environment_file_is_a_config_error() {
    let err = Settings::load(Environment::Development, "config").unwrap_err();
    assert!(matches!(err, Error::Config { .. }), "{err:?}");
}

#[test]
fn test_tick_interval_follows_tick_rate() {
    let mut settings = helper::test_settings();
    settings.tick_rate_hz = 50;
    assert_eq!(settings.tick_interval(), std::time::Duration::from_millis(20));

    settings.tick_rate_hz = 0;
    assert_eq!(settings.tick_interval(), std::time::Duration::from_secs(1));
}
