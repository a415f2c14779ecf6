pub mod matches;
pub mod problem;
pub mod queue;
pub mod user;
