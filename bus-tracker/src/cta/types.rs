//! Bus tracker API response DTOs.
//!
//! Every endpoint wraps its payload as
//! `{ "bustime-response": { "<field>": [ ... ] } }`. The records map
//! directly to the backend's JSON; numeric fields such as coordinates
//! arrive as either JSON numbers or strings.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::error::CtaError;

/// Top-level key wrapping every response payload.
pub const ENVELOPE_KEY: &str = "bustime-response";

/// A JSON scalar that may be sent as a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Numeric value, parsing string forms like `"41.9"`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Scalar::Number(n) => n.as_f64(),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }

    /// Textual value, e.g. a vehicle id sent as `101` or `"101"`.
    pub fn into_text(self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

/// An entry of the `routes` list.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    pub rt: Scalar,
    #[serde(default)]
    pub rtnm: Option<String>,
}

/// An entry of the `directions` list.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionDto {
    pub dir: String,
}

/// An entry of the `stops` list.
#[derive(Debug, Clone, Deserialize)]
pub struct StopDto {
    pub stpid: Scalar,
    pub stpnm: String,
}

/// An entry of the `vehicle` list.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleDto {
    pub vid: Scalar,
    pub lat: Scalar,
    pub lon: Scalar,
    #[serde(default)]
    pub hdg: Option<Scalar>,
    #[serde(default)]
    pub des: Option<String>,
}

/// An entry of the `prd` list.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionDto {
    pub rt: Scalar,
    pub rtdir: String,
    pub prdtm: String,
}

/// An entry of the envelope's `error` list.
#[derive(Debug, Clone, Deserialize)]
struct BackendErrorDto {
    #[serde(default)]
    msg: Option<String>,
}

/// Unwrap `bustime-response.<field>` from a response body.
///
/// A body whose envelope carries an `error` list and no `field` is reported
/// as [`CtaError::Backend`] with the first message. A `field` that is not a
/// list is a [`CtaError::Json`]; records inside it that do not fit `T` are
/// dropped one by one with a warning.
pub fn unwrap_envelope<T: DeserializeOwned>(
    body: &str,
    field: &'static str,
) -> Result<Vec<T>, CtaError> {
    let value: Value = serde_json::from_str(body).map_err(|e| CtaError::Json {
        message: e.to_string(),
    })?;

    let envelope = value
        .get(ENVELOPE_KEY)
        .ok_or(CtaError::MissingField {
            field: ENVELOPE_KEY,
        })?;

    let Some(payload) = envelope.get(field) else {
        if let Some(errors) = envelope.get("error") {
            let errors: Vec<BackendErrorDto> =
                serde_json::from_value(errors.clone()).unwrap_or_default();
            let message = errors
                .into_iter()
                .find_map(|e| e.msg)
                .unwrap_or_else(|| "unspecified error".to_string());
            return Err(CtaError::Backend(message));
        }
        return Err(CtaError::MissingField { field });
    };

    let Value::Array(records) = payload else {
        return Err(CtaError::Json {
            message: format!("{field}: expected a list"),
        });
    };

    Ok(records
        .iter()
        .filter_map(|record| match T::deserialize(record) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(field, error = %e, "dropping malformed record");
                None
            }
        })
        .collect())
}
