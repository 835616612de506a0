/// Integration tests for query behavior against a live climate store
///
/// These tests exercise the full handler path: request-scoped session,
/// one query, row shaping. They insert TEST-prefixed fixture rows and
/// clean them up around each test.
///
/// Prerequisites:
/// - PostgreSQL running with the measurement and station tables created
/// - DATABASE_URL set in .env
/// - A scratch database: several tests assume the fixture rows are the
///   only measurement rows, so do not point this at real data
///
/// All tests are ignored by default. Run with:
///   cargo test --test store_integration -- --ignored --test-threads=1

use chrono::NaiveDate;
use climo_service::config::WindowConfig;
use climo_service::db::Store;
use climo_service::model::TempStats;
use climo_service::queries;
use postgres::{Client, NoTls};
use rust_decimal::Decimal;
use std::env;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn setup_test_db() -> Client {
    dotenv::dotenv().ok();
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    Client::connect(&database_url, NoTls).expect("Failed to connect to test database")
}

fn test_store() -> Store {
    dotenv::dotenv().ok();
    Store::from_env().expect("DATABASE_URL must be set")
}

fn cleanup_test_data(client: &mut Client) {
    // Clean up fixture rows between tests
    let _ = client.execute("DELETE FROM measurement WHERE station_id LIKE 'TEST%'", &[]);
    let _ = client.execute("DELETE FROM station WHERE station_id LIKE 'TEST%'", &[]);
}

fn insert_measurement(
    client: &mut Client,
    station_id: &str,
    date: &str,
    prcp: Option<Decimal>,
    tobs: Option<Decimal>,
) {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("fixture dates are well-formed");
    client
        .execute(
            "INSERT INTO measurement (station_id, date, prcp, tobs) VALUES ($1, $2, $3, $4)",
            &[&station_id, &date, &prcp, &tobs],
        )
        .expect("Insert should succeed");
}

// ---------------------------------------------------------------------------
// 1. Startup Validation
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Requires a provisioned climate database
fn test_store_validation_succeeds() {
    let store = test_store();
    let result = store.connect_and_verify(&["measurement", "station"]);

    assert!(
        result.is_ok(),
        "Store validation should pass against a provisioned database: {:?}",
        result.err()
    );
}

#[test]
#[ignore] // Requires a provisioned climate database
fn test_missing_table_is_detected() {
    let store = test_store();
    let result = store.connect_and_verify(&["no_such_table"]);

    assert!(result.is_err(), "Missing tables must be detected");

    if let Err(error) = result {
        let message = error.to_string();
        assert!(
            message.contains("no_such_table"),
            "Error message should identify the missing table, got: {}",
            message
        );
    }
}

// ---------------------------------------------------------------------------
// 2. Temperature Statistics
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Requires a provisioned climate database
fn test_round_trip_stats_for_synthetic_row() {
    let mut client = setup_test_db();
    cleanup_test_data(&mut client);

    insert_measurement(
        &mut client,
        "TESTT1",
        "2020-01-01",
        Some(Decimal::new(15, 1)), // 1.5
        Some(Decimal::new(70, 0)),
    );

    let stats = queries::temperature_stats_start_end(&test_store(), "2020-01-01", "2020-01-01")
        .expect("stats query should succeed");

    assert_eq!(
        stats,
        TempStats {
            temp_min: Some(70.0),
            temp_ave: Some(70.0),
            temp_max: Some(70.0),
        }
    );

    cleanup_test_data(&mut client);
}

#[test]
#[ignore] // Requires a provisioned climate database
fn test_stats_beyond_all_data_return_nulls() {
    let mut client = setup_test_db();
    cleanup_test_data(&mut client);

    // Guarantee the dataset is non-empty, then query past everything.
    insert_measurement(
        &mut client,
        "TESTT1",
        "2020-01-01",
        None,
        Some(Decimal::new(70, 0)),
    );

    let stats = queries::temperature_stats_start(&test_store(), "9999-01-01")
        .expect("stats query should succeed");

    assert_eq!(
        stats,
        TempStats::empty(),
        "a start date beyond all data must yield all-null stats, not zeros"
    );

    cleanup_test_data(&mut client);
}

#[test]
#[ignore] // Requires a provisioned climate database
fn test_inverted_range_returns_nulls() {
    let mut client = setup_test_db();
    cleanup_test_data(&mut client);

    insert_measurement(
        &mut client,
        "TESTT1",
        "2020-01-01",
        None,
        Some(Decimal::new(70, 0)),
    );

    // end before start: empty intersection
    let stats = queries::temperature_stats_start_end(&test_store(), "2020-01-02", "2020-01-01")
        .expect("stats query should succeed");

    assert_eq!(stats, TempStats::empty());

    cleanup_test_data(&mut client);
}

// ---------------------------------------------------------------------------
// 3. Station Listing
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Requires a provisioned climate database
fn test_station_listing_matches_row_count() {
    let mut client = setup_test_db();

    let expected: i64 = client
        .query_one("SELECT COUNT(*) FROM station", &[])
        .expect("Count query should succeed")
        .get(0);

    let ids = queries::station_ids(&test_store()).expect("station query should succeed");

    assert_eq!(
        ids.len() as i64,
        expected,
        "one entry per station row, in store order"
    );
}

// ---------------------------------------------------------------------------
// 4. Most Active Station (tobs)
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Requires a scratch climate database (empty measurement table)
fn test_tobs_reports_only_most_active_station() {
    let mut client = setup_test_db();
    cleanup_test_data(&mut client);

    // Station A: 5 observations. Station B: 3, on dates A never reported.
    for (date, temp) in [
        ("2020-01-01", 71),
        ("2020-01-02", 72),
        ("2020-01-03", 73),
        ("2020-01-04", 74),
        ("2020-01-05", 75),
    ] {
        insert_measurement(&mut client, "TESTA", date, None, Some(Decimal::new(temp, 0)));
    }
    for (date, temp) in [
        ("2020-02-01", 61),
        ("2020-02-02", 62),
        ("2020-02-03", 63),
    ] {
        insert_measurement(&mut client, "TESTB", date, None, Some(Decimal::new(temp, 0)));
    }

    let map = queries::tobs(&test_store(), &WindowConfig::default())
        .expect("tobs query should succeed");

    assert_eq!(map.len(), 5, "only the most active station's rows appear");
    for date in ["2020-01-01", "2020-01-02", "2020-01-03", "2020-01-04", "2020-01-05"] {
        assert!(map.contains_key(date), "station A's {} should be present", date);
    }
    for date in ["2020-02-01", "2020-02-02", "2020-02-03"] {
        assert!(!map.contains_key(date), "station B's {} should be absent", date);
    }

    cleanup_test_data(&mut client);
}

// ---------------------------------------------------------------------------
// 5. Precipitation Window
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Requires a scratch climate database (empty measurement table)
fn test_precipitation_window_excludes_rows_older_than_one_year() {
    let mut client = setup_test_db();
    cleanup_test_data(&mut client);

    // Latest observation anchors the window; the 2018 row falls outside it.
    insert_measurement(&mut client, "TESTA", "2020-01-01", Some(Decimal::new(5, 1)), None);
    insert_measurement(&mut client, "TESTA", "2018-01-01", Some(Decimal::new(99, 1)), None);

    let map = queries::precipitation(&test_store(), &WindowConfig::default())
        .expect("precipitation query should succeed");

    assert!(map.contains_key("2020-01-01"), "in-window row should be present");
    assert!(
        !map.contains_key("2018-01-01"),
        "rows older than one year before the latest date must be excluded"
    );

    cleanup_test_data(&mut client);
}

#[test]
#[ignore] // Requires a scratch climate database (empty measurement table)
fn test_empty_store_yields_empty_precipitation() {
    let mut client = setup_test_db();
    cleanup_test_data(&mut client);

    let map = queries::precipitation(&test_store(), &WindowConfig::default())
        .expect("precipitation over an empty store is not an error");

    assert!(map.is_empty(), "empty store must serialize as an empty object");
}

#[test]
#[ignore] // Requires a scratch climate database (empty measurement table)
fn test_pinned_anchor_overrides_latest_date() {
    let mut client = setup_test_db();
    cleanup_test_data(&mut client);

    // Rows cluster around 2017; a later stray row would normally drag the
    // window forward and exclude them. Pinning the anchor keeps them in.
    insert_measurement(&mut client, "TESTA", "2017-08-20", Some(Decimal::new(3, 2)), None);
    insert_measurement(&mut client, "TESTA", "2019-06-01", Some(Decimal::new(1, 2)), None);

    let window = WindowConfig {
        precipitation_anchor: NaiveDate::from_ymd_opt(2017, 8, 23),
        tobs_threshold: None,
    };

    let map = queries::precipitation(&test_store(), &window)
        .expect("precipitation query should succeed");

    assert!(
        map.contains_key("2017-08-20"),
        "pinned anchor must keep the 2017 rows in the window"
    );

    cleanup_test_data(&mut client);
}
