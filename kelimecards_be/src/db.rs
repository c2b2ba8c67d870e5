use crate::{
    models::{CardStatus, Translation},
    review::{self, Feedback, ReviewOutcome, ReviewState},
};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, sqlite::SqlitePool, types::Json};

pub async fn create_tables_in_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "
CREATE TABLE IF NOT EXISTS card (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  turkish_word VARCHAR(100) NOT NULL UNIQUE,
  translations_json TEXT NOT NULL,
  correct_repetitions INTEGER NOT NULL DEFAULT 0,
  status VARCHAR(20) NOT NULL DEFAULT 'new'
)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS card_status ON card (status)")
        .execute(pool)
        .await?;

    sqlx::query(
        "
CREATE TABLE IF NOT EXISTS setting (
  key VARCHAR(50) PRIMARY KEY,
  value VARCHAR(100) NOT NULL
)
",
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DbCard {
    pub id: i64,
    pub turkish_word: String,
    #[sqlx(json, rename = "translations_json")]
    pub translations: Vec<Translation>,
    pub status: CardStatus,
    pub correct_repetitions: u32,
}

const CARD_COLUMNS: &str = "id, turkish_word, translations_json, status, correct_repetitions";

/// Result of a create that may collide with an existing word.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(DbCard),
    Duplicate,
}

impl DbCard {
    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            correct_repetitions: self.correct_repetitions,
            status: self.status,
        }
    }

    pub async fn create(args: CardArgs, pool: &SqlitePool) -> Result<CreateOutcome, sqlx::Error> {
        let inserted = sqlx::query_as::<_, DbCard>(&format!(
            "
      INSERT INTO card (turkish_word, translations_json, status, correct_repetitions)
      VALUES ($1, $2, $3, 0)
      RETURNING {CARD_COLUMNS}
    "
        ))
        .bind(&args.turkish_word)
        .bind(Json(&args.translations))
        .bind(CardStatus::New)
        .fetch_one(pool)
        .await;

        match inserted {
            Ok(card) => Ok(CreateOutcome::Created(card)),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Ok(CreateOutcome::Duplicate)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn get_by_id<'a, Ex>(id: i64, executor: Ex) -> Result<Option<Self>, sqlx::Error>
    where
        Ex: sqlx::Executor<'a, Database = Sqlite>,
    {
        sqlx::query_as(&format!("SELECT {CARD_COLUMNS} FROM card WHERE id = $1 LIMIT 1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn list_by_status(
        status: CardStatus,
        pool: &SqlitePool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {CARD_COLUMNS} FROM card WHERE status = $1 ORDER BY turkish_word ASC"
        ))
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Cards still being learned, shuffled. Falls back to learned cards so a
    /// fully learned deck can still be drilled.
    pub async fn pick_for_review(limit: u32, pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let due: Vec<Self> = sqlx::query_as(&format!(
            "SELECT {CARD_COLUMNS} FROM card WHERE status != $1 ORDER BY RANDOM() LIMIT $2"
        ))
        .bind(CardStatus::Learned)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;

        if !due.is_empty() || limit == 0 {
            return Ok(due);
        }

        sqlx::query_as(&format!(
            "SELECT {CARD_COLUMNS} FROM card WHERE status = $1 ORDER BY RANDOM() LIMIT $2"
        ))
        .bind(CardStatus::Learned)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await
    }

    /// Applies `feedback` and persists the result. Returns `None` if the card
    /// does not exist.
    ///
    /// The transaction opens with a write so it holds the database write lock
    /// before the card is read. Concurrent reviews of the same card queue up on
    /// that lock and each one sees the state left by the previous.
    pub async fn apply_review(
        id: i64,
        feedback: Feedback,
        threshold: u32,
        pool: &SqlitePool,
    ) -> Result<Option<ReviewedCard>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let claimed =
            sqlx::query("UPDATE card SET correct_repetitions = correct_repetitions WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        if claimed.rows_affected() == 0 {
            return Ok(None);
        }

        let Some(mut card) = Self::get_by_id(id, &mut *tx).await? else {
            return Ok(None);
        };
        let before = card.review_state();
        let ReviewOutcome {
            state,
            became_learned,
        } = review::apply_feedback(before, feedback, threshold);

        sqlx::query("UPDATE card SET correct_repetitions = $1, status = $2 WHERE id = $3")
            .bind(i64::from(state.correct_repetitions))
            .bind(state.status)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        log::debug!(
            "card {id} reviewed {feedback:?}: {} -> {} ({} correct)",
            before.status,
            state.status,
            state.correct_repetitions
        );
        card.correct_repetitions = state.correct_repetitions;
        card.status = state.status;
        Ok(Some(ReviewedCard {
            card,
            became_learned,
        }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardArgs {
    pub turkish_word: String,
    pub translations: Vec<Translation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewedCard {
    #[serde(flatten)]
    pub card: DbCard,
    pub became_learned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CardStats {
    pub total: i64,
    pub learned: i64,
    pub learning: i64,
    pub new: i64,
}

impl CardStats {
    pub async fn current(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            "
SELECT
  COUNT(*) AS total,
  COALESCE(SUM(status = 'learned'), 0) AS learned,
  COALESCE(SUM(status = 'learning'), 0) AS learning,
  COALESCE(SUM(status = 'new'), 0) AS new
FROM card
",
        )
        .fetch_one(pool)
        .await
    }
}
