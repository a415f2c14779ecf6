pub mod judge_service_errors;
pub mod match_service_errors;
pub mod matchmaking_service_errors;
pub mod problem_service_errors;
pub mod settlement_service_errors;
pub mod user_service_errors;
