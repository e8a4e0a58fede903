mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_malformed_vehicle_csv_handling() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("fleet.csv");
    common::write_vehicle_csv(
        &input,
        &[
            // Valid
            ["Model 3", "50", "0.8"],
            // Rate is not a number
            ["Model Y", "sixty", "0.9"],
            // Blank model
            ["", "70", "1.0"],
            // Negative per-km rate
            ["Model S", "80", "-1"],
            // Valid again
            ["Model X", "95", "1.1"],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("fleetrent"));
    cmd.arg("import-vehicles").arg(&input).env_remove("FLEETRENT_DB");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading vehicle record 2"))
        .stderr(predicate::str::contains("Error reading vehicle record 3"))
        .stderr(predicate::str::contains("Error reading vehicle record 4"))
        .stdout(predicate::str::contains("Imported 2 vehicles, rejected 3"));
}

#[test]
fn test_fixture_import() {
    let mut cmd = Command::new(cargo_bin!("fleetrent"));
    cmd.args(["import-vehicles", "tests/fixtures/vehicles.csv"])
        .env_remove("FLEETRENT_DB");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 vehicles, rejected 0"));
}

#[test]
fn test_missing_import_file() {
    let mut cmd = Command::new(cargo_bin!("fleetrent"));
    cmd.args(["import-vehicles", "does/not/exist.csv"])
        .env_remove("FLEETRENT_DB");

    cmd.assert().failure();
}
