//! Postgres-backed stores. Snapshot, result, and completed items live
//! in JSONB columns; rows convert to domain types through serde.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::assessment::{Assessment, AssessmentSummary, CompletedItem};
use crate::models::profile::ProfileSnapshot;
use crate::store::{AssessmentStore, ProfileStore};

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<ProfileSnapshot, AppError> {
        let row: Option<(Value,)> =
            sqlx::query_as("SELECT profile FROM user_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((profile,)) => serde_json::from_value(profile)
                .map_err(|e| AppError::Internal(anyhow!("Corrupt profile for {user_id}: {e}"))),
            None => Ok(ProfileSnapshot::default()),
        }
    }

    async fn put_profile(
        &self,
        user_id: Uuid,
        snapshot: &ProfileSnapshot,
    ) -> Result<(), AppError> {
        let profile = serde_json::to_value(snapshot)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize profile: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, profile, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id) DO UPDATE SET profile = $2, updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(&profile)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AssessmentRow {
    id: Uuid,
    user_id: Uuid,
    job_role: String,
    profile_snapshot: Value,
    result: Value,
    completed_items: Value,
    created_at: DateTime<Utc>,
}

impl AssessmentRow {
    fn into_assessment(self) -> Result<Assessment, AppError> {
        Ok(Assessment {
            id: self.id,
            user_id: self.user_id,
            job_role: self.job_role,
            profile_snapshot: decode(self.profile_snapshot, self.id, "profile_snapshot")?,
            result: decode(self.result, self.id, "result")?,
            completed_items: decode(self.completed_items, self.id, "completed_items")?,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct AssessmentSummaryRow {
    id: Uuid,
    user_id: Uuid,
    job_role: String,
    result: Value,
    completed_items: Value,
    created_at: DateTime<Utc>,
}

impl AssessmentSummaryRow {
    fn into_summary(self) -> Result<AssessmentSummary, AppError> {
        Ok(AssessmentSummary {
            id: self.id,
            user_id: self.user_id,
            job_role: self.job_role,
            result: decode(self.result, self.id, "result")?,
            completed_items: decode(self.completed_items, self.id, "completed_items")?,
            created_at: self.created_at,
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    value: Value,
    id: Uuid,
    column: &str,
) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Internal(anyhow!("Corrupt {column} on assessment {id}: {e}")))
}

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn insert(&self, assessment: &Assessment) -> Result<(), AppError> {
        let snapshot = serde_json::to_value(&assessment.profile_snapshot)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize snapshot: {e}")))?;
        let result = serde_json::to_value(&assessment.result)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize result: {e}")))?;
        let completed = serde_json::to_value(&assessment.completed_items)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize items: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO assessments
                (id, user_id, job_role, profile_snapshot, result, completed_items, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(assessment.id)
        .bind(assessment.user_id)
        .bind(&assessment.job_role)
        .bind(&snapshot)
        .bind(&result)
        .bind(&completed)
        .bind(assessment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Assessment>, AppError> {
        let row = sqlx::query_as::<_, AssessmentRow>(
            r#"
            SELECT id, user_id, job_role, profile_snapshot, result, completed_items, created_at
            FROM assessments
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AssessmentRow::into_assessment).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AssessmentSummary>, AppError> {
        let rows = sqlx::query_as::<_, AssessmentSummaryRow>(
            r#"
            SELECT id, user_id, job_role, result, completed_items, created_at
            FROM assessments
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(AssessmentSummaryRow::into_summary)
            .collect()
    }

    async fn save_completed_items(
        &self,
        id: Uuid,
        user_id: Uuid,
        items: &[CompletedItem],
    ) -> Result<(), AppError> {
        let completed = serde_json::to_value(items)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize items: {e}")))?;

        let outcome = sqlx::query(
            "UPDATE assessments SET completed_items = $1 WHERE id = $2 AND user_id = $3",
        )
        .bind(&completed)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if outcome.rows_affected() == 0 {
            return Err(AppError::NotFound("Assessment not found".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let outcome = sqlx::query("DELETE FROM assessments WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(outcome.rows_affected() > 0)
    }
}
