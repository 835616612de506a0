/// climo_service: read-only HTTP query façade for a climate observation store.
///
/// # Module structure
///
/// ```text
/// climo_service
/// ├── model    — typed store records (Measurement, Station) and TempStats
/// ├── config   — service configuration loader (climo.toml)
/// ├── db       — store handle, startup validation, typed row accessors
/// ├── queries  — one handler per route: fetch plus pure shaping
/// └── endpoint — HTTP routing surface (route table, worker pool, responses)
/// ```

/// Public modules
pub mod config;
pub mod db;
pub mod endpoint;
pub mod model;
pub mod queries;
