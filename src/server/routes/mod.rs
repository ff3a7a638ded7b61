mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::{Category, Question};

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

/// Category id to its display label, in ascending id order.
pub type CategoryMap = BTreeMap<i64, String>;

fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

/// Shared shape of every response that lists questions.
#[derive(Serialize)]
struct QuestionsBody {
    questions: Vec<Question>,
    total_questions: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<CategoryMap>,
    current_category: Option<String>,
}

impl QuestionsBody {
    fn unpaginated(questions: Vec<Question>, current_category: Option<String>) -> Self {
        Self {
            total_questions: questions.len() as i64,
            questions,
            categories: None,
            current_category,
        }
    }
}
