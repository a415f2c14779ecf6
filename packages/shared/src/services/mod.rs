pub mod errors;
pub mod judge_service;
pub mod match_events;
pub mod match_service;
pub mod matchmaking_service;
pub mod problem_service;
pub mod settlement_service;
pub mod user_service;
