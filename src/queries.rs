/// Query handlers, one per route.
///
/// Each handler is a pure function of (store state, request parameters):
/// it opens its own request-scoped session, performs its read, shapes the
/// rows into a JSON-serializable value, and returns. The session drops at
/// scope exit, closing the connection on every path. No handler mutates
/// anything.
///
/// Date windows are anchored dynamically: the reporting year is the 365
/// days leading up to the latest observation date in the store. Fixed
/// anchors can be pinned in `climo.toml` for datasets whose published
/// figures assume a specific cutoff.

use crate::config::WindowConfig;
use crate::db::{self, Store};
use crate::model::{Measurement, TempStats};
use chrono::{Duration, NaiveDate};
use serde_json::{Map, Value};
use std::error::Error;

// ---------------------------------------------------------------------------
// Window arithmetic
// ---------------------------------------------------------------------------

/// First date of the one-year reporting window ending at `anchor`.
pub fn window_start(anchor: NaiveDate) -> NaiveDate {
    anchor - Duration::days(365)
}

/// Parses a date path parameter.
///
/// A parameter that is not an ISO 8601 date matches no rows by definition,
/// so callers map a failed parse straight to the empty result rather than
/// rejecting the request.
pub fn parse_date_param(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Row shaping
// ---------------------------------------------------------------------------

/// Builds a date-keyed map from measurement rows, iterating in store-return
/// order and overwriting on duplicate dates (last row wins). A NULL
/// observation becomes a JSON null entry rather than being dropped, matching
/// the dataset's habit of recording gauge-silent days.
pub fn date_value_map<F>(measurements: &[Measurement], value: F) -> Map<String, Value>
where
    F: Fn(&Measurement) -> Option<f64>,
{
    let mut map = Map::new();

    for measurement in measurements {
        let entry = match value(measurement) {
            Some(v) => Value::from(v),
            None => Value::Null,
        };
        map.insert(measurement.date.to_string(), entry);
    }

    map
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Precipitation for the most recent year of data, keyed by date.
///
/// The window anchor is the latest observation date in the store (or the
/// configured override); the window runs from anchor minus 365 days onward.
/// An empty store yields an empty object.
pub fn precipitation(
    store: &Store,
    window: &WindowConfig,
) -> Result<Map<String, Value>, Box<dyn Error>> {
    let mut session = store.session()?;

    let anchor = match window.precipitation_anchor {
        Some(date) => Some(date),
        None => db::latest_measurement_date(&mut session)?,
    };

    let anchor = match anchor {
        Some(date) => date,
        None => return Ok(Map::new()), // empty store
    };

    let measurements = db::fetch_measurements_since(&mut session, window_start(anchor))?;

    Ok(date_value_map(&measurements, |m| m.precipitation))
}

/// All station identifiers, in store-return order.
pub fn station_ids(store: &Store) -> Result<Vec<String>, Box<dyn Error>> {
    let mut session = store.session()?;

    let stations = db::fetch_stations(&mut session)?;

    Ok(stations.into_iter().map(|s| s.station_id).collect())
}

/// Temperature observations for the most active station, keyed by date.
///
/// The most active station is the one with the highest measurement row
/// count. Observations are reported from the configured threshold onward,
/// defaulting to one year before the latest observation date.
pub fn tobs(store: &Store, window: &WindowConfig) -> Result<Map<String, Value>, Box<dyn Error>> {
    let mut session = store.session()?;

    let station_id = match db::most_active_station(&mut session)? {
        Some(id) => id,
        None => return Ok(Map::new()), // empty store
    };

    let threshold = match window.tobs_threshold {
        Some(date) => date,
        None => match db::latest_measurement_date(&mut session)? {
            Some(latest) => window_start(latest),
            None => return Ok(Map::new()),
        },
    };

    let measurements =
        db::fetch_station_measurements_since(&mut session, &station_id, threshold)?;

    Ok(date_value_map(&measurements, |m| m.temperature_observation))
}

/// MIN/AVG/MAX temperature for all observations on or after `start`.
///
/// A malformed `start` matches no rows and yields all-null stats. The parse
/// happens before any session is opened, so a junk parameter never touches
/// the store.
pub fn temperature_stats_start(store: &Store, start: &str) -> Result<TempStats, Box<dyn Error>> {
    let start = match parse_date_param(start) {
        Some(date) => date,
        None => return Ok(TempStats::empty()),
    };

    let mut session = store.session()?;

    Ok(db::temperature_stats(&mut session, start, None)?)
}

/// MIN/AVG/MAX temperature for observations between `start` and `end`
/// inclusive. An inverted range (end before start) is an empty intersection
/// and yields all-null stats, as does a malformed date on either side.
pub fn temperature_stats_start_end(
    store: &Store,
    start: &str,
    end: &str,
) -> Result<TempStats, Box<dyn Error>> {
    let (start, end) = match (parse_date_param(start), parse_date_param(end)) {
        (Some(start), Some(end)) => (start, end),
        _ => return Ok(TempStats::empty()),
    };

    let mut session = store.session()?;

    Ok(db::temperature_stats(&mut session, start, Some(end))?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
