use axum::http::StatusCode;

pub async fn health_check() -> (StatusCode, String) {
    return (StatusCode::OK, "Healthy!".to_string());
}
