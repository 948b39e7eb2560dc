use std::io::Write;

use flight_delay::inference::batch::{score_csv, score_path, BatchError, RowFailure};
use flight_delay::inference::{DecisionPolicy, InferenceContext};

const SHIPPED_ARTIFACTS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../artifacts/current");

const FLIGHTS: &str = "\
airline,origin,destination,departure,distance_km,temperature,wind_speed,visibility
AZ,GIG,GRU,2025-11-10T14:30:00,350,,,
G3, GRU , SSA ,2025-11-14 18:45,1450,29.5,14,8000
LA,BSB,REC,,1650,,,
TP,POA,CNF,2025-11-12T06:10:00,-5,,,
";

fn context() -> InferenceContext {
    InferenceContext::from_artifacts(SHIPPED_ARTIFACTS, DecisionPolicy::default())
        .expect("shipped artifacts load")
}

#[test]
fn scores_valid_rows_and_reports_invalid_ones() {
    let context = context();

    let outcomes = score_csv(&context, FLIGHTS.as_bytes(), false).expect("csv readable");

    assert_eq!(outcomes.len(), 4);
    assert_eq!(
        outcomes.iter().map(|outcome| outcome.row).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    let first = outcomes[0].result.as_ref().expect("first row scores");
    assert!(first.fallback_used);

    let second = outcomes[1].result.as_ref().expect("second row scores");
    assert!(!second.fallback_used);
    assert_eq!(outcomes[1].request.origin.as_deref(), Some("GRU"));

    match &outcomes[2].result {
        Err(RowFailure::Invalid(err)) => {
            assert_eq!(err.violations.len(), 1);
            assert_eq!(err.violations[0].field, "departure");
        }
        other => panic!("row 3 should fail validation: {other:?}"),
    }

    match &outcomes[3].result {
        Err(RowFailure::Invalid(err)) => assert_eq!(err.violations[0].field, "distance_km"),
        other => panic!("row 4 should fail validation: {other:?}"),
    }
}

#[test]
fn explained_rows_carry_payloads() {
    let context = context();

    let outcomes = score_csv(&context, FLIGHTS.as_bytes(), true).expect("csv readable");

    let explained = outcomes[0].result.as_ref().expect("row scores");
    let explanation = explained.explanation.as_ref().expect("explanation present");
    assert_eq!(explanation.top_3_features.len(), 3);
}

#[test]
fn unparseable_departure_fails_only_that_row() {
    let context = context();
    let csv = "\
airline,origin,destination,departure,distance_km,temperature,wind_speed,visibility
AZ,GIG,GRU,next tuesday,350,,,
AZ,GIG,GRU,2025-11-10T14:30:00,350,,,
";

    let outcomes = score_csv(&context, csv.as_bytes(), false).expect("csv readable");

    assert!(matches!(outcomes[0].result, Err(RowFailure::Inference(_))));
    assert!(outcomes[1].result.is_ok());
}

#[test]
fn non_numeric_distance_aborts_the_batch() {
    let context = context();
    let csv = "\
airline,origin,destination,departure,distance_km,temperature,wind_speed,visibility
AZ,GIG,GRU,2025-11-10T14:30:00,far,,,
";

    let err = score_csv(&context, csv.as_bytes(), false).expect_err("bad number");

    assert!(matches!(err, BatchError::Csv(_)));
}

#[test]
fn scores_a_file_on_disk() {
    let context = context();
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(FLIGHTS.as_bytes()).expect("write flights");

    let outcomes = score_path(&context, file.path(), false).expect("file readable");

    assert_eq!(outcomes.len(), 4);
}

#[test]
fn missing_file_is_an_io_error() {
    let context = context();

    let err = score_path(&context, "/nonexistent/flights.csv", false).expect_err("no file");

    assert!(matches!(err, BatchError::Io(_)));
}
