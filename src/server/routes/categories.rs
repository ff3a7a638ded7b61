use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::queries::{categories, questions},
    server::{app::AppState, ApiError, ApiResponse},
};

use super::{category_map, CategoryMap, QuestionsBody};

#[derive(Serialize)]
struct CategoriesBody {
    categories: CategoryMap,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesBody>> {
    let categories = category_map(categories::get_all_categories(&pool).await?);
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody { categories }))
}

async fn get_category_questions(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<QuestionsBody>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let questions = questions::get_questions_for_category(&pool, id).await?;
    // an unknown category is an error even when orphaned questions reference it
    let category = categories::get_category(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(QuestionsBody::unpaginated(
        questions,
        Some(category.kind),
    )))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
        .with_state(state)
}
