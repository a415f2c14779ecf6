use std::sync::Arc;

use shared::services::judge_service::JudgeService;
use shared::services::match_events::MatchEventService;
use shared::services::match_service::MatchService;
use shared::services::matchmaking_service::MatchmakingService;
use shared::services::problem_service::ProblemService;
use shared::services::user_service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub matchmaking_service: Arc<MatchmakingService>,
    pub match_service: Arc<MatchService>,
    pub match_event_service: MatchEventService,
    pub problem_service: Arc<ProblemService>,
    pub user_service: Arc<UserService>,
    pub judge_service: Arc<JudgeService>,
}
