use axum::{routing::get, Router};
use lambda_http::{run, tracing, Error};
use std::env::set_var;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod routes;
pub mod state;

use shared::repositories::match_repository::DynamoDbMatchRepository;
use shared::repositories::match_watch_repository::DynamoDbMatchWatchRepository;
use shared::repositories::problem_repository::DynamoDbProblemRepository;
use shared::repositories::queue_repository::DynamoDbQueueRepository;
use shared::repositories::user_repository::DynamoDbUserRepository;
use shared::services::judge_service::JudgeService;
use shared::services::match_events::MatchEventService;
use shared::services::match_service::MatchService;
use shared::services::matchmaking_service::MatchmakingService;
use shared::services::problem_service::ProblemService;
use shared::services::user_service::UserService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let queue_repository = Arc::new(DynamoDbQueueRepository::new(client.clone()));
    let match_repository = Arc::new(DynamoDbMatchRepository::new(client.clone()));
    let match_watch_repository = Arc::new(DynamoDbMatchWatchRepository::new(client.clone()));
    let problem_repository = Arc::new(DynamoDbProblemRepository::new(client.clone()));
    let user_repository = Arc::new(DynamoDbUserRepository::new(client.clone()));

    let problem_service = ProblemService::new(problem_repository);
    let matchmaking_service = Arc::new(MatchmakingService::new(
        queue_repository,
        match_repository.clone(),
        problem_service.clone(),
    ));
    let match_service = Arc::new(MatchService::new(match_repository));
    let match_event_service = MatchEventService::new(match_watch_repository);
    let user_service = Arc::new(UserService::new(user_repository));
    let judge_service = Arc::new(JudgeService::new());

    let app_state = state::AppState {
        matchmaking_service,
        match_service,
        match_event_service,
        problem_service: Arc::new(problem_service),
        user_service,
        judge_service,
    };

    // ToDo: Tighten this up
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::matchmaking::routes())
        .merge(routes::matches::routes())
        .merge(routes::leaderboard::routes())
        .layer(cors)
        .with_state(app_state);

    run(app).await
}
