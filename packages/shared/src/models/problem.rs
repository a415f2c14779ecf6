use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

/// One entry of the problem catalog. The catalog is read-only reference
/// data; matches only store the `problem_id`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Problem {
    pub problem_id: String,
    pub title: String,
    pub difficulty: String,
    pub description: String,
    pub test_cases: Vec<TestCase>,
}
