use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn order_insights() -> Command {
    let mut cmd = Command::cargo_bin("order-insights").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_usage_without_a_file() {
    order_insights()
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "Usage: order-insights <filename> <command1> <command2> ...",
        ));
}

#[test]
fn answers_commands_in_argument_order() {
    order_insights()
        .arg(fixture("orders.csv"))
        .args(["hp", "pms", "apd"])
        .assert()
        .success()
        .stdout(
            "The most ordered pizza category is Classic.\n\
             The most ordered pizza is The Barbecue Chicken Pizza.\n\
             The average ordered pizzas per day is 6.0.\n",
        );
}

#[test]
fn unknown_command_does_not_stop_the_run() {
    order_insights()
        .arg(fixture("orders.csv"))
        .args(["pms", "xyz", "dms"])
        .assert()
        .success()
        .stdout(
            "The most ordered pizza is The Barbecue Chicken Pizza.\n\
             Command 'xyz' not found.\n\
             The date with the most revenue is 1/3/2015 with a total of $114.50.\n",
        );
}

#[test]
fn hyphenated_tokens_are_treated_as_commands() {
    order_insights()
        .arg(fixture("orders.csv"))
        .args(["pms", "-x", "--jobs", "dmsp"])
        .assert()
        .success()
        .stdout(
            "The most ordered pizza is The Barbecue Chicken Pizza.\n\
             Command '-x' not found.\n\
             Command '--jobs' not found.\n\
             The date with the most sold pizzas is 1/3/2015 with a total of 7.\n",
        );
}

#[test]
fn aliases_are_accepted() {
    order_insights()
        .arg(fixture("orders.csv"))
        .arg("least-items-date")
        .assert()
        .success()
        .stdout("The date with the least sold pizzas is 1/2/2015 with a total of 5.\n");
}

#[test]
fn parallel_run_keeps_argument_order() {
    order_insights()
        .args(["--jobs", "4"])
        .arg(fixture("orders.csv"))
        .args(["ims", "apo", "dls"])
        .assert()
        .success()
        .stdout(
            "The most ordered ingredient is Tomatoes.\n\
             The average ordered pizzas per order is 2.6.\n\
             The date with the least revenue is 1/2/2015 with a total of $96.75.\n",
        );
}

#[test]
fn zero_jobs_is_rejected() {
    order_insights()
        .args(["-j", "0"])
        .arg(fixture("orders.csv"))
        .arg("pms")
        .assert()
        .failure()
        .stderr(predicate::str::contains("num_threads must be > 0"));
}

#[test]
fn json_format_prints_one_object_per_command() {
    let output = order_insights()
        .args(["--format", "json"])
        .arg(fixture("orders.csv"))
        .args(["dmsp", "nope"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["value"], "1/3/2015");
    assert_eq!(lines[0]["total"], 7.0);
    assert_eq!(lines[1]["status"], "not_found");
}

#[test]
fn missing_file_reports_open_error() {
    order_insights()
        .arg(fixture("does_not_exist.csv"))
        .arg("pms")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::starts_with("Error opening file ").and(predicate::str::contains(
            "does_not_exist.csv.",
        )));
}

#[test]
fn empty_file_is_reported() {
    order_insights()
        .arg(fixture("empty.csv"))
        .arg("pms")
        .assert()
        .failure()
        .code(1)
        .stdout("Empty file.\n");
}

#[test]
fn header_only_file_has_no_orders() {
    order_insights()
        .arg(fixture("header_only.csv"))
        .arg("pms")
        .assert()
        .failure()
        .code(1)
        .stdout("No orders were placed.\n");
}

#[test]
fn file_without_commands_prints_nothing() {
    order_insights()
        .arg(fixture("orders.csv"))
        .assert()
        .success()
        .stdout("");
}

#[test]
fn list_shows_every_command() {
    order_insights()
        .arg("--list")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("pms")
                .and(predicate::str::contains("most-ordered-item"))
                .and(predicate::str::contains("average-items-per-day"))
                .and(predicate::str::contains("most-popular-category")),
        );
}

#[test]
fn log_file_records_the_load() {
    let log = std::env::temp_dir().join(format!(
        "order_insights_cli_{}.log",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&log);

    order_insights()
        .arg("--log-file")
        .arg(&log)
        .arg(fixture("orders.csv"))
        .arg("hp")
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log).unwrap();
    let event: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(event["event"], "loaded");
    assert_eq!(event["rows"], 12);
    let _ = std::fs::remove_file(&log);
}
