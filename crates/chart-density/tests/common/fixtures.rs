//! Test fixture loading utilities

use std::path::PathBuf;

use chart_density::RecordSet;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load the penguin measurements from the JSON fixture
#[allow(dead_code)]
pub fn penguins_json() -> RecordSet {
    RecordSet::from_json_str(&load_fixture("penguins.json"))
        .unwrap_or_else(|e| panic!("Failed to parse penguins.json: {}", e))
}

/// Load the penguin measurements from the CSV fixture
#[allow(dead_code)]
pub fn penguins_csv() -> RecordSet {
    RecordSet::from_path(fixture_path("penguins.csv"))
        .unwrap_or_else(|e| panic!("Failed to parse penguins.csv: {}", e))
}

/// The three morphology fields plotted together
#[allow(dead_code)]
pub const MORPHOLOGY_FIELDS: [&str; 3] = [
    "Beak Length (mm)",
    "Beak Depth (mm)",
    "Flipper Length (mm)",
];
