use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_demo_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("demo").env_remove("FLEETRENT_DB");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Car rental platform initialized"))
        .stdout(predicate::str::contains(
            "ID: 1, Model: Model 3, Hourly Rate: 50, Per Km Rate: 0.8",
        ))
        // 150 km at 0.8 plus a few milliseconds at 50/h
        .stdout(predicate::str::contains(
            "Rental 1 ended. Total amount: €120.00",
        ));

    Ok(())
}

#[test]
fn test_list_vehicles_on_empty_fleet_prints_header() {
    let mut cmd = Command::new(cargo_bin!("fleetrent"));
    cmd.arg("list-vehicles").env_remove("FLEETRENT_DB");

    cmd.assert()
        .success()
        .stdout(predicate::eq("id,model,hourly_rate,per_km_rate\n"));
}

#[test]
fn test_unknown_client_fails_with_message() {
    let mut cmd = Command::new(cargo_bin!("fleetrent"));
    cmd.args(["start-rental", "--client", "1", "--vehicle", "1"])
        .env_remove("FLEETRENT_DB");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("client 1 not found"));
}

#[test]
fn test_negative_rate_is_rejected() {
    let mut cmd = Command::new(cargo_bin!("fleetrent"));
    cmd.args([
        "add-vehicle",
        "Model 3",
        "--hourly-rate=-5",
        "--per-km-rate",
        "0.8",
    ])
    .env_remove("FLEETRENT_DB");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("rate must not be negative"));
}
