#![deny(rust_2018_idioms)]

//! Tracks a ship and its tenders from a position feed and keeps an extrapolated marker for
//! each of them, with an estimate of where every tender is heading.

pub mod consumer;
pub mod error;
pub mod fleet;
pub mod hub;
pub mod marker;
pub mod models;
pub mod pier;
pub mod poller;
pub mod settings;
pub mod startup;
pub mod streamer;
pub mod telemetry;
