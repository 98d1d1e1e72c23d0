//! Mental-health assessment endpoints
//!
//! `OPTIONS /api/mental-health-assessments` and `GET .../questions` list
//! the screening questions. A submission at or above the crisis threshold
//! also creates a crisis notification, atomically.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::paginate;
use crate::db::repos::{Assessment, AssessmentDetail, AssessmentRepo, Question, Submitted};
use crate::http::envelope::{ApiResponse, ApiResult};
use crate::http::extractors::{JsonBody, PathId, QueryParams};
use crate::http::server::AppState;
use crate::models::{Answer, ScoredAssessment, ValidationError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentQuery {
    pub user_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: Option<i64>,
    #[serde(alias = "answerValue")]
    pub value: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub user_id: Option<i64>,
    pub total_score: Option<i32>,
    #[serde(default)]
    pub answers: Vec<AnswerRequest>,
}

impl SubmitRequest {
    fn validate(self) -> Result<ScoredAssessment, ValidationError> {
        let answers = self
            .answers
            .into_iter()
            .map(|a| Answer::new(a.question_id, a.value))
            .collect::<Result<Vec<_>, _>>()?;
        ScoredAssessment::new(self.user_id, answers, self.total_score)
    }
}

/// GET /api/mental-health-assessments/questions, OPTIONS /api/mental-health-assessments
async fn list_questions(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Question>> {
    Ok(ApiResponse::ok(AssessmentRepo::new(&state.db).questions().await?))
}

/// GET /api/mental-health-assessments
async fn list_assessments(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<AssessmentQuery>,
) -> ApiResult<Vec<Assessment>> {
    let rows = AssessmentRepo::new(&state.db)
        .list(q.user_id, paginate(q.page, q.per_page))
        .await?;
    Ok(ApiResponse::ok(rows))
}

async fn get_assessment(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> ApiResult<AssessmentDetail> {
    Ok(ApiResponse::ok(AssessmentRepo::new(&state.db).get(id).await?))
}

/// POST /api/mental-health-assessments
async fn submit_assessment(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SubmitRequest>,
) -> ApiResult<Submitted> {
    let scored = req.validate()?;
    let submitted = AssessmentRepo::new(&state.db).create(scored).await?;
    Ok(ApiResponse::created(submitted))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/mental-health-assessments",
            get(list_assessments)
                .post(submit_assessment)
                .options(list_questions),
        )
        .route("/mental-health-assessments/questions", get(list_questions))
        .route("/mental-health-assessments/{id}", get(get_assessment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::routes::testing;
    use crate::models::RiskLevel;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn answers_are_summed() {
        let req: SubmitRequest = serde_json::from_value(json!({
            "userId": 4,
            "answers": [
                {"questionId": 1, "value": 3},
                {"questionId": 2, "answerValue": 2},
            ],
        }))
        .unwrap();
        let scored = req.validate().unwrap();
        assert_eq!(scored.total_score, 5);
        assert_eq!(scored.risk_level, RiskLevel::Low);
    }

    #[test]
    fn score_alone_is_accepted() {
        let req: SubmitRequest = serde_json::from_value(json!({"totalScore": 21})).unwrap();
        let scored = req.validate().unwrap();
        assert!(scored.needs_crisis_alert());
        assert_eq!(scored.risk_level, RiskLevel::High);
    }

    #[tokio::test]
    async fn answer_out_of_range_is_400() {
        let request = testing::json(
            "POST",
            "/api/mental-health-assessments",
            json!({"answers": [{"questionId": 1, "value": 4}]}),
        );
        let (status, body) = testing::send(testing::app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "answers.value must be between 0 and 3");
    }

    #[tokio::test]
    async fn mismatched_total_is_400() {
        let request = testing::json(
            "POST",
            "/api/mental-health-assessments",
            json!({"totalScore": 9, "answers": [{"questionId": 1, "value": 1}]}),
        );
        let (status, _) = testing::send(testing::app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
