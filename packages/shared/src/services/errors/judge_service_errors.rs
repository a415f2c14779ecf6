#[derive(Debug)]
pub enum JudgeServiceError {
    UnsupportedLanguage(String),
    RateLimited,
    Http(String),
    Serialization(String),
}

impl std::fmt::Display for JudgeServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JudgeServiceError::UnsupportedLanguage(language) => {
                write!(f, "Unsupported language: {}", language)
            }
            JudgeServiceError::RateLimited => {
                write!(f, "Judge rate limit persisted through all retries")
            }
            JudgeServiceError::Http(msg) => write!(f, "Judge HTTP error: {}", msg),
            JudgeServiceError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for JudgeServiceError {}
