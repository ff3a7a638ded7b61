//! CSV export and import of the whole data set.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::{get_all_categories, import_categories};
use crate::db::queries::questions::{get_all_questions, import_questions};
use crate::db::{Category, Question};

const CATEGORIES_FILE: &str = "categories.csv";
const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: &[impl Serialize]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    write_to(&dir.join(CATEGORIES_FILE), &categories)?;
    write_to(&dir.join(QUESTIONS_FILE), &questions)?;
    tracing::info!(
        "Exported {} categories and {} questions to {}",
        categories.len(),
        questions.len(),
        dir.display()
    );
    Ok(())
}

/// Replaces both tables with the contents of the CSV files in `dir`. Nothing
/// is changed if any file fails to parse or any row fails to insert.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;

    let mut tx = pool.begin().await?;
    import_categories(&mut tx, &categories).await?;
    import_questions(&mut tx, &questions).await?;
    tx.commit().await?;

    tracing::info!(
        "Imported {} categories and {} questions",
        categories.len(),
        questions.len()
    );
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
    async fn export_then_import_restores_tables() {
        let dir = tempfile::tempdir().unwrap();
        let source = seeded_pool().await;
        export_data(&source, dir.path()).await.unwrap();

        let target = seeded_pool().await;
        sqlx::query("DELETE FROM questions WHERE id > 5")
            .execute(&target)
            .await
            .unwrap();
        import_data(&target, dir.path()).await.unwrap();

        assert_eq!(
            get_all_categories(&target).await.unwrap(),
            get_all_categories(&source).await.unwrap()
        );
        assert_eq!(
            get_all_questions(&target).await.unwrap(),
            get_all_questions(&source).await.unwrap()
        );
    }

    #[tokio::test]
    async fn uncategorised_questions_survive_export() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool().await;
        sqlx::query("UPDATE questions SET category = NULL WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();
        export_data(&pool, dir.path()).await.unwrap();
        import_data(&pool, dir.path()).await.unwrap();

        let first = &get_all_questions(&pool).await.unwrap()[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.category, None);
    }

    #[tokio::test]
    async fn broken_file_leaves_tables_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool().await;
        std::fs::write(dir.path().join(CATEGORIES_FILE), "id,type\n1,Science\n").unwrap();
        std::fs::write(dir.path().join(QUESTIONS_FILE), "id,question\nnot-a-number,x\n").unwrap();

        assert!(import_data(&pool, dir.path()).await.is_err());
        assert_eq!(get_all_categories(&pool).await.unwrap().len(), 6);
        assert_eq!(get_all_questions(&pool).await.unwrap().len(), 19);
    }
}
