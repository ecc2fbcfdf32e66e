use std::path::Path;

use bigsky_domain::{Error, Result, TestCase, ToolName};
use serde::Deserialize;

#[derive(Deserialize)]
struct SuiteFixture {
    test_cases: Vec<TestCase>,
}

/// Reads a JSON suite fixture `{"test_cases": [...]}`
pub fn load_suite(path: &Path, name: &str) -> Result<Vec<TestCase>> {
    let content = std::fs::read_to_string(path).map_err(|error| {
        Error::invalid_fixture(name, format!("No test cases found at {}: {error}", path.display()))
    })?;
    let fixture: SuiteFixture = serde_json::from_str(&content)
        .map_err(|error| Error::invalid_fixture(name, format!("Invalid test cases JSON: {error}")))?;
    Ok(fixture.test_cases)
}

/// Reads a CSV eval set with a header row and the columns
/// `evaluation_id, query, expected_tool, previous_grade`. The previous grade
/// column is not graded against; every row is expected to pass.
pub fn load_csv(path: &Path) -> Result<Vec<TestCase>> {
    let name = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|error| Error::invalid_fixture(&name, error))?;

    reader
        .records()
        .map(|record| {
            let record = record.map_err(|error| Error::invalid_fixture(&name, error))?;
            let column = |index: usize| record.get(index).unwrap_or_default();
            let case = TestCase::new(column(1), ToolName::new(column(2)));
            Ok(match column(0) {
                "" => case,
                id => case.evaluation_id(id),
            })
        })
        .collect()
}
