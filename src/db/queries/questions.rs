use std::ops::Range;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: Option<i64>,
    pub difficulty: i64,
}

/// Fields of a question to insert. Missing values are bound as NULL and left
/// for the table constraints to reject.
#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

/// Eligibility rules for the next quiz question.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizFilter<'a> {
    pub category: Option<i64>,
    pub exclude: &'a [i64],
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Questions at positions `rows` of the listing ordered by id.
pub async fn get_questions_in_range(
    pool: &SqlitePool,
    rows: Range<i64>,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        ORDER BY id
        LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(rows.end - rows.start)
    .bind(rows.start)
    .fetch_all(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring search over the question text, ordered by id.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    // SQLite LIKE only folds ASCII, so matching happens here
    let term = term.to_lowercase();
    let mut found = get_all_questions(pool).await?;
    found.retain(|q| q.question.to_lowercase().contains(&term));
    Ok(found)
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question.question.as_deref())
    .bind(question.answer.as_deref())
    .bind(question.category)
    .bind(question.difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Uniformly random question satisfying `filter`, `None` once nothing is left.
pub async fn pick_quiz_question(
    pool: &SqlitePool,
    filter: QuizFilter<'_>,
) -> sqlx::Result<Option<Question>> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, question, answer, category, difficulty FROM questions WHERE 1 = 1",
    );
    if let Some(category) = filter.category {
        builder.push(" AND category = ").push_bind(category);
    }
    if !filter.exclude.is_empty() {
        // bound once as a JSON array, the list may exceed SQLite's variable limit
        let exclude =
            serde_json::to_string(filter.exclude).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        builder
            .push(" AND id NOT IN (SELECT value FROM json_each(")
            .push_bind(exclude)
            .push("))");
    }
    builder.push(" ORDER BY RANDOM() LIMIT 1");

    builder
        .build_query_as::<Question>()
        .fetch_optional(pool)
        .await
}

/// Replaces every question with `questions`, keeping their ids.
pub async fn import_questions(
    conn: &mut SqliteConnection,
    questions: &[Question],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM questions")
        .execute(&mut *conn)
        .await?;
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn seeded_pool() -> SqlitePool {
        let pool = db::connect_in_memory().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = seeded_pool().await;
        let new_question = NewQuestion {
            question: Some("Où se trouve l'ÉCOLE polytechnique?".to_string()),
            answer: Some("Palaiseau".to_string()),
            category: Some(3),
            difficulty: Some(2),
        };
        let id = create_question(&pool, &new_question).await.unwrap();

        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.iter().map(|q| q.id).collect::<Vec<_>>(), vec![id]);
    }

    #[tokio::test]
    async fn quiz_pick_skips_excluded_ids() {
        let pool = seeded_pool().await;
        let filter = QuizFilter {
            category: Some(6),
            exclude: &[8],
        };
        let picked = pick_quiz_question(&pool, filter).await.unwrap().unwrap();
        assert_eq!(picked.id, 9);

        let exclude: Vec<i64> = (1..=50_000).collect();
        let filter = QuizFilter {
            category: None,
            exclude: &exclude,
        };
        assert!(pick_quiz_question(&pool, filter).await.unwrap().is_none());
    }
}
