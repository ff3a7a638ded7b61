use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::{
    deserialize_default_from_null, deserialize_option_number_from_string,
};
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question, QuizFilter},
    server::{app::AppState, deserializers::LenientI64, ApiError, ApiResponse},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    previous_questions: Vec<LenientI64>,
    quiz_category: Option<QuizCategory>,
}

#[derive(Deserialize)]
struct QuizCategory {
    // 0, "" or null select every category
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Serialize)]
struct NextQuestion {
    question: Option<Question>,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<NextQuestion>> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let quiz_category = request
        .quiz_category
        .ok_or_else(|| ApiError::BadRequest("quiz_category is required".to_owned()))?;

    let category = quiz_category.id.filter(|id| *id != 0);
    let previous: Vec<i64> = request.previous_questions.into_iter().map(|id| id.0).collect();
    tracing::debug!(
        "Drawing quiz question for category {:?} ({:?}), {} already asked",
        category,
        quiz_category.kind,
        previous.len()
    );

    let question = questions::pick_quiz_question(
        &pool,
        QuizFilter {
            category,
            exclude: &previous,
        },
    )
    .await?;

    if question.is_some() {
        let label = category.map_or_else(|| "all".to_owned(), |id| id.to_string());
        QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
    }
    Ok(Json(NextQuestion { question }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_quiz_question))
        .with_state(state)
}
