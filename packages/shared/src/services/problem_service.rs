use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::models::problem::Problem;
use crate::repositories::problem_repository::ProblemRepository;
use crate::services::errors::problem_service_errors::ProblemServiceError;

#[derive(Clone)]
pub struct ProblemService {
    repository: Arc<dyn ProblemRepository + Send + Sync>,
}

impl ProblemService {
    pub fn new(repository: Arc<dyn ProblemRepository + Send + Sync>) -> Self {
        ProblemService { repository }
    }

    /// Uniform pick across the whole catalog; every pairing draws a
    /// fresh shared problem this way.
    pub async fn random_problem(&self) -> Result<Problem, ProblemServiceError> {
        let problems = self.repository.list_problems().await?;

        let mut rng = rand::thread_rng();
        problems
            .choose(&mut rng)
            .cloned()
            .ok_or(ProblemServiceError::EmptyCatalog)
    }

    pub async fn get_problem(&self, problem_id: &str) -> Result<Problem, ProblemServiceError> {
        self.repository
            .get_problem(problem_id)
            .await
            .map_err(ProblemServiceError::from)
    }
}
