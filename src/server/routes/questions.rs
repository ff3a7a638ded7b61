use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion,
    },
    pagination::Page,
    server::{
        app::AppState,
        deserializers::{deserialize_page, deserialize_search_term},
        ApiError, ApiResponse,
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{category_map, QuestionsBody};

#[derive(Default, Deserialize)]
struct QuestionsQuery {
    #[serde(default, deserialize_with = "deserialize_page")]
    page: Page,
}

/// Body of `POST /questions`: a search when `searchTerm` is given, a new
/// question otherwise.
#[derive(Deserialize)]
struct QuestionsRequest {
    #[serde(
        rename = "searchTerm",
        default,
        deserialize_with = "deserialize_search_term"
    )]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

#[derive(Serialize)]
struct Created {
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    query: Result<Query<QuestionsQuery>, QueryRejection>,
) -> ApiResponse<Json<QuestionsBody>> {
    // a query string that does not deserialize (e.g. a repeated `page`) is the first page
    let QuestionsQuery { page } = query.map(|Query(query)| query).unwrap_or_default();
    let rows = page.bounds().ok_or(ApiError::NotFound)?;
    let page_questions = questions::get_questions_in_range(&pool, rows).await?;
    if page_questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = questions::count_questions(&pool).await?;
    let categories = category_map(categories::get_all_categories(&pool).await?);

    Ok(Json(QuestionsBody {
        questions: page_questions,
        total_questions,
        categories: Some(categories),
        current_category: None,
    }))
}

async fn create_or_search_questions(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuestionsRequest>, JsonRejection>,
) -> ApiResponse<Response> {
    let Json(request) = body.map_err(|rejection| ApiError::ValidationFailed(rejection.body_text()))?;

    if let Some(term) = request.search_term {
        let found = questions::search_questions(&pool, &term).await?;
        return Ok(Json(QuestionsBody::unpaginated(found, None)).into_response());
    }

    let new_question = NewQuestion {
        question: request.question,
        answer: request.answer,
        category: request.category,
        difficulty: request.difficulty,
    };
    let id = questions::create_question(&pool, &new_question).await?;
    QUESTIONS_CREATED.inc();
    tracing::info!("Created question {id}");

    Ok((StatusCode::CREATED, Json(Created { created: id })).into_response())
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Deleted>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    if questions::get_question(&pool, id).await?.is_none() {
        return Err(ApiError::ValidationFailed(format!(
            "question {id} does not exist"
        )));
    }
    questions::delete_question(&pool, id).await?;
    QUESTIONS_DELETED.inc();
    tracing::info!("Deleted question {id}");

    Ok(Json(Deleted { deleted: id }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/questions",
            get(get_questions).post(create_or_search_questions),
        )
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
