pub mod match_repository_errors;
pub mod problem_repository_errors;
pub mod queue_repository_errors;
pub mod settlement_repository_errors;
pub mod user_repository_errors;
