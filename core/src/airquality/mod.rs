//! Pairing a balloon flight with the regulator's hourly air-quality history.
//!
//! Only the pure parts live here: deriving the flight window, building the
//! history request and decoding its JSON body. Issuing the request is up to
//! the caller.

pub mod payload;
pub mod query;
pub mod window;

pub use payload::{mark_flight, parse_history, AirQualityPoint};
pub use query::{HistoryQuery, Pollutant, DEFAULT_ENDPOINT, DEFAULT_STATION};
pub use window::FlightWindow;
