pub mod errors;
pub mod match_repository;
pub mod match_watch_repository;
pub mod problem_repository;
pub mod queue_repository;
pub mod settlement_repository;
pub mod user_repository;
