use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::problem::TestCase;
use crate::services::errors::judge_service_errors::JudgeServiceError;

/// Final grading summary; the only thing that leaves this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgeSummary {
    pub test_cases_passed: u32,
    pub total_test_cases: u32,
}

const STATUS_IN_QUEUE: u32 = 1;
const STATUS_PROCESSING: u32 = 2;
const STATUS_ACCEPTED: u32 = 3;

const MAX_ATTEMPTS: u32 = 6;
const MAX_POLLS: u32 = 20;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(8);
const POLL_DELAY: Duration = Duration::from_millis(750);

fn next_backoff(delay: Duration) -> Duration {
    (delay * 2).min(MAX_BACKOFF)
}

fn language_id(language: &str) -> Result<u32, JudgeServiceError> {
    match language.to_ascii_lowercase().as_str() {
        "python" => Ok(71),
        "javascript" => Ok(63),
        "java" => Ok(62),
        "cpp" | "c++" => Ok(54),
        "rust" => Ok(73),
        other => Err(JudgeServiceError::UnsupportedLanguage(other.to_string())),
    }
}

#[derive(Serialize)]
struct SubmissionRequest<'a> {
    source_code: &'a str,
    language_id: u32,
    stdin: &'a str,
    expected_output: &'a str,
}

#[derive(Deserialize)]
struct SubmissionToken {
    token: String,
}

#[derive(Deserialize)]
struct Verdict {
    status: VerdictStatus,
}

#[derive(Deserialize)]
struct VerdictStatus {
    id: u32,
    description: String,
}

/// Client for the remote execution judge. Submits one judge run per
/// test case and polls for verdicts; rate-limit responses back off
/// exponentially with bounded attempts.
#[derive(Clone)]
pub struct JudgeService {
    http: reqwest::Client,
    base_url: String,
}

impl JudgeService {
    pub fn new() -> Self {
        let base_url = std::env::var("JUDGE_API_URL")
            .expect("JUDGE_API_URL environment variable must be set");
        JudgeService {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn with_base_url(base_url: &str) -> Self {
        JudgeService {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
        }
    }

    pub async fn run_test_cases(
        &self,
        code: &str,
        language: &str,
        test_cases: &[TestCase],
    ) -> Result<JudgeSummary, JudgeServiceError> {
        let language_id = language_id(language)?;

        let mut passed = 0;
        for case in test_cases {
            let token = self.create_submission(code, language_id, case).await?;
            let verdict = self.poll_verdict(&token).await?;

            if verdict.status.id == STATUS_ACCEPTED {
                passed += 1;
            } else {
                debug!("Test case failed: {}", verdict.status.description);
            }
        }

        Ok(JudgeSummary {
            test_cases_passed: passed,
            total_test_cases: test_cases.len() as u32,
        })
    }

    async fn create_submission(
        &self,
        code: &str,
        language_id: u32,
        case: &TestCase,
    ) -> Result<String, JudgeServiceError> {
        let url = format!("{}/submissions?base64_encoded=false&wait=false", self.base_url);
        let request = SubmissionRequest {
            source_code: code,
            language_id,
            stdin: &case.input,
            expected_output: &case.expected_output,
        };

        let mut delay = INITIAL_BACKOFF;
        for _ in 0..MAX_ATTEMPTS {
            let response = self
                .http
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| JudgeServiceError::Http(e.to_string()))?;

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                warn!("Judge rate limited, backing off {:?}", delay);
                tokio::time::sleep(delay).await;
                delay = next_backoff(delay);
                continue;
            }
            if !response.status().is_success() {
                return Err(JudgeServiceError::Http(format!(
                    "judge returned {}",
                    response.status()
                )));
            }

            let token: SubmissionToken = response
                .json()
                .await
                .map_err(|e| JudgeServiceError::Serialization(e.to_string()))?;
            return Ok(token.token);
        }

        Err(JudgeServiceError::RateLimited)
    }

    async fn poll_verdict(&self, token: &str) -> Result<Verdict, JudgeServiceError> {
        let url = format!("{}/submissions/{}?base64_encoded=false", self.base_url, token);

        let mut delay = INITIAL_BACKOFF;
        for _ in 0..MAX_POLLS {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| JudgeServiceError::Http(e.to_string()))?;

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                warn!("Judge rate limited while polling, backing off {:?}", delay);
                tokio::time::sleep(delay).await;
                delay = next_backoff(delay);
                continue;
            }
            if !response.status().is_success() {
                return Err(JudgeServiceError::Http(format!(
                    "judge returned {}",
                    response.status()
                )));
            }

            let verdict: Verdict = response
                .json()
                .await
                .map_err(|e| JudgeServiceError::Serialization(e.to_string()))?;

            if verdict.status.id == STATUS_IN_QUEUE || verdict.status.id == STATUS_PROCESSING {
                tokio::time::sleep(POLL_DELAY).await;
                continue;
            }
            return Ok(verdict);
        }

        Err(JudgeServiceError::Http(
            "judge verdict did not finish in time".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_id_mapping() {
        assert_eq!(language_id("python").unwrap(), 71);
        assert_eq!(language_id("Rust").unwrap(), 73);
        assert_eq!(language_id("C++").unwrap(), 54);
        assert!(matches!(
            language_id("cobol"),
            Err(JudgeServiceError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let first = next_backoff(INITIAL_BACKOFF);
        assert_eq!(first, Duration::from_secs(1));

        let mut delay = INITIAL_BACKOFF;
        for _ in 0..10 {
            delay = next_backoff(delay);
        }
        assert_eq!(delay, MAX_BACKOFF);
    }

    #[test]
    fn test_summary_counts_are_plain_data() {
        let summary = JudgeSummary {
            test_cases_passed: 2,
            total_test_cases: 3,
        };
        assert_eq!(summary.test_cases_passed, 2);
        assert_eq!(summary.total_test_cases, 3);
    }
}
