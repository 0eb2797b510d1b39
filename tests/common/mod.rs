#![allow(dead_code)]

use std::fs;
use std::process::{Command, Output};

use rentalhub::{MemoryCollaborator, Record};
use serde_json::json;
use tempfile::TempDir;

/// Runs the `rentalhub` binary against a config file in a temp directory
pub struct RentalHubTest {
    pub temp_dir: TempDir,
}

impl RentalHubTest {
    /// Config pointing at a port nothing listens on, with a short timeout.
    pub fn new() -> Self {
        Self::with_config("api_base_url: http://127.0.0.1:1/\nrequest_timeout_secs: 2\n")
    }

    pub fn with_config(yaml: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("config.yaml"), yaml).expect("Failed to write config");
        RentalHubTest { temp_dir }
    }

    pub fn config_path(&self) -> String {
        self.temp_dir
            .path()
            .join("config.yaml")
            .to_string_lossy()
            .to_string()
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_rentalhub"))
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("RENTALHUB_CONFIG", self.config_path())
            .env_remove("RENTALHUB_TOKEN")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute rentalhub command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Command {:?} should have failed\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

// ============================================================================
// Record fixtures
// ============================================================================

pub const REPORTS_PATH: &str = "api/lost-and-found/admin/all";
pub const TRANSACTIONS_PATH: &str = "api/transaction";
pub const VEHICLES_PATH: &str = "api/vehicles";

pub fn report(id: u32, title: &str) -> Record {
    Record::from_value(json!({
        "id": id,
        "title": title,
        "description": "reported at the front desk",
        "type": if title.starts_with("Found") { "found" } else { "lost" },
        "status": "active",
        "location": "Pokhara",
        "user": { "fname": "Gita" },
        "createdAt": format!("2024-05-{id:02}T09:00:00Z"),
        "date": format!("2024-05-{id:02}"),
    }))
    .unwrap()
}

/// `n` reports with ascending ids and creation dates.
pub fn reports(n: u32) -> Vec<Record> {
    (1..=n).map(|id| report(id, &format!("Report {id}"))).collect()
}

pub fn reports_api(records: Vec<Record>) -> MemoryCollaborator {
    MemoryCollaborator::new()
        .with_list(REPORTS_PATH, records)
        .with_route("api/lost-and-found", REPORTS_PATH)
        .with_route("api/lost-and-found/edit", REPORTS_PATH)
        .with_route("api/lost-and-found/resolve", REPORTS_PATH)
}

pub fn transaction(id: u32, customer: Option<&str>, amount: f64, status: &str) -> Record {
    let booking = match customer {
        Some(name) => json!({ "User": { "fname": name, "email": format!("{}@example.com", name.to_lowercase()) } }),
        None => json!(null),
    };
    Record::from_value(json!({
        "id": id,
        "type": "booking",
        "amount": amount,
        "status": status,
        "createdAt": format!("2024-06-{id:02}T12:00:00Z"),
        "Booking": booking,
        "user": null,
    }))
    .unwrap()
}

pub fn vehicle(id: u32, make: &str, price: Option<f64>, posted_by: &str) -> Record {
    let mut value = json!({
        "id": id,
        "make": make,
        "model": "Base",
        "year": 2020,
        "status": "available",
        "postedBy": posted_by,
        "createdAt": format!("2024-04-{id:02}T08:00:00Z"),
    });
    if let Some(price) = price {
        value["priceDay"] = json!(price);
    }
    Record::from_value(value).unwrap()
}
