/// Shared record and response types for the climate query service.
///
/// The store schema is fixed and known, so rows are decoded into these
/// explicit typed records rather than discovered at runtime. All access is
/// read-only; nothing in this service ever writes either table.

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Store records
// ---------------------------------------------------------------------------

/// One station's observation record for one date.
///
/// The store typically holds one row per station per day, but duplicate
/// dates are not rejected here; they flow through to the handlers, which
/// collapse them last-write-wins when building date-keyed maps.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Station identifier referencing the station table.
    pub station_id: String,
    /// Observation date.
    pub date: NaiveDate,
    /// Precipitation in inches. NULL when the gauge reported nothing.
    pub precipitation: Option<f64>,
    /// Temperature observation in degrees Fahrenheit. NULL when not taken.
    pub temperature_observation: Option<f64>,
}

/// Metadata record for one observing location.
#[derive(Debug, Clone)]
pub struct Station {
    /// Unique station identifier, e.g. "USC00519281".
    pub station_id: String,
    /// Official station name.
    pub name: String,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Elevation in meters.
    pub elevation: f64,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Summary temperature statistics over a date range.
///
/// SQL aggregates over an empty set yield NULL; those nulls are carried
/// through to the JSON body unchanged rather than being coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempStats {
    pub temp_min: Option<f64>,
    pub temp_ave: Option<f64>,
    pub temp_max: Option<f64>,
}

impl TempStats {
    /// Stats for a range that matched no rows.
    pub fn empty() -> Self {
        Self {
            temp_min: None,
            temp_ave: None,
            temp_max: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
