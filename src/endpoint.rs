/// HTTP routing surface for the climate query service.
///
/// Stateless request/response dispatch over an embedded HTTP server. Every
/// request is independent: no sessions, no cookies, no cross-request memory.
///
/// Endpoints:
/// - GET /                          - Plain-text index of available routes
/// - GET /api/v1.0/precipitation    - Last year of precipitation, date-keyed
/// - GET /api/v1.0/stations         - Station identifier list
/// - GET /api/v1.0/tobs             - Most active station's temperatures
/// - GET /api/v1.0/{start}          - Temperature stats from a start date
/// - GET /api/v1.0/{start}/{end}    - Temperature stats for a date range

use crate::config::WindowConfig;
use crate::db::Store;
use crate::queries;
use serde_json::Value;
use std::error::Error;
use threadpool::ThreadPool;

// ---------------------------------------------------------------------------
// Route matching
// ---------------------------------------------------------------------------

/// Matched route for one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Welcome,
    Precipitation,
    Stations,
    Tobs,
    StatsStart(String),
    StatsStartEnd(String, String),
}

impl Route {
    /// Maps a request path to its route.
    ///
    /// The fixed-name routes are checked before the date patterns, so a
    /// literal segment like "stations" is never read as a start date. Any
    /// other single segment under /api/v1.0/ is a `{start}` parameter; two
    /// segments are `{start}/{end}`; anything else is unmatched.
    pub fn match_path(path: &str) -> Option<Route> {
        match path {
            "/" => return Some(Route::Welcome),
            "/api/v1.0/precipitation" => return Some(Route::Precipitation),
            "/api/v1.0/stations" => return Some(Route::Stations),
            "/api/v1.0/tobs" => return Some(Route::Tobs),
            _ => {}
        }

        let rest = path.strip_prefix("/api/v1.0/")?;
        let segments: Vec<&str> = rest.split('/').collect();

        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        match segments.as_slice() {
            [start] => Some(Route::StatsStart((*start).to_string())),
            [start, end] => Some(Route::StatsStartEnd((*start).to_string(), (*end).to_string())),
            _ => None,
        }
    }
}

/// Body served on the index route.
const WELCOME_TEXT: &str = "Available Routes:\n\
    /api/v1.0/precipitation\n\
    /api/v1.0/stations\n\
    /api/v1.0/tobs\n\
    /api/v1.0/{start}\n\
    /api/v1.0/{start}/{end}\n";

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start the HTTP server on the specified bind address and port.
///
/// Incoming requests are dispatched to a worker pool; each worker opens its
/// own store session, so concurrent requests share nothing but the store
/// itself.
pub fn start_endpoint_server(
    bind: &str,
    port: u16,
    workers: usize,
    store: Store,
    window: WindowConfig,
    debug: bool,
) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("{}:{}", bind, port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://{}:{}", bind, port);
    println!("{}", WELCOME_TEXT);

    let pool = ThreadPool::new(workers);

    for request in server.incoming_requests() {
        let store = store.clone();
        let window = window.clone();

        pool.execute(move || handle_request(request, &store, &window, debug));
    }

    Ok(())
}

/// Handle a single request: match the route, run its query, respond.
fn handle_request(request: tiny_http::Request, store: &Store, window: &WindowConfig, debug: bool) {
    let method = request.method().clone();
    let url = request.url().to_string();
    let path = url.splitn(2, '?').next().unwrap_or("");

    if debug {
        println!("→ {} {}", method, path);
    }

    let response = if method != tiny_http::Method::Get {
        create_response(
            405,
            serde_json::json!({
                "error": "Method not allowed",
                "allowed_methods": ["GET"]
            }),
        )
    } else {
        match Route::match_path(path) {
            Some(route) => dispatch(route, store, window),
            None => create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": [
                        "/",
                        "/api/v1.0/precipitation",
                        "/api/v1.0/stations",
                        "/api/v1.0/tobs",
                        "/api/v1.0/{start}",
                        "/api/v1.0/{start}/{end}"
                    ]
                }),
            ),
        }
    };

    if let Err(e) = request.respond(response) {
        eprintln!("Failed to send response: {}", e);
    }
}

/// Run the matched route's query handler and shape the HTTP response.
fn dispatch(
    route: Route,
    store: &Store,
    window: &WindowConfig,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let result: Result<Value, Box<dyn Error>> = match route {
        Route::Welcome => return text_response(WELCOME_TEXT),
        Route::Precipitation => queries::precipitation(store, window).map(Value::Object),
        Route::Stations => queries::station_ids(store).map(Value::from),
        Route::Tobs => queries::tobs(store, window).map(Value::Object),
        Route::StatsStart(start) => queries::temperature_stats_start(store, &start)
            .and_then(|stats| serde_json::to_value(stats).map_err(Into::into)),
        Route::StatsStartEnd(start, end) => {
            queries::temperature_stats_start_end(store, &start, &end)
                .and_then(|stats| serde_json::to_value(stats).map_err(Into::into))
        }
    };

    match result {
        Ok(value) => create_response(200, value),
        Err(e) => {
            eprintln!("Query failed: {}", e);
            create_response(
                500,
                serde_json::json!({
                    "error": "Internal server error",
                    "detail": e.to_string()
                }),
            )
        }
    }
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap();
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

/// Create HTTP response with plain-text body
fn text_response(body: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    tiny_http::Response::from_data(body.as_bytes().to_vec()).with_header(
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/plain; charset=utf-8"[..])
            .unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
