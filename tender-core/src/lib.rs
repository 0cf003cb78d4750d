#![deny(rust_2018_idioms)]

//! Core of the tender tracker: geodesy, dead reckoning of vessel positions between fixes and
//! classification of which waypoint a tender is heading for.

mod dead_reckoning;
mod destination;
mod domain;
mod error;
pub mod geodesy;
mod ports;
mod presentation;

pub use dead_reckoning::*;
pub use destination::*;
pub use domain::*;
pub use error::*;
pub use ports::*;
pub use presentation::*;
