//! Bus tracker backend client.
//!
//! The backend exposes five JSON GET endpoints under `/cta/bus/`. Every
//! response wraps its list in a `bustime-response` envelope; a missing
//! envelope or field is reported as an error and left to the caller to
//! degrade.

mod api;
mod client;
mod convert;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod types;

pub use api::TransitApi;
pub use client::{CtaClient, CtaConfig, DEFAULT_BASE_URL};
pub use error::CtaError;
pub use types::{ENVELOPE_KEY, Scalar, unwrap_envelope};
