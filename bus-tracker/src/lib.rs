//! Bus tracker server.
//!
//! A rider picks a route, a direction and a stop; the server fetches each
//! dependent collection from a CTA Bus Tracker proxy, tracks live vehicles
//! on a map and shows arrival predictions on request.

pub mod cascade;
pub mod config;
pub mod cta;
pub mod domain;
pub mod geolocation;
pub mod registry;
pub mod session;
pub mod view;
pub mod viewport;
pub mod web;
