//! Persistence seams for the assessment core.
//!
//! Both stores are trait objects carried in `AppState`, so the service
//! layer and its tests never touch SQL directly. Postgres
//! implementations live in `postgres.rs`.

pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::assessment::{Assessment, AssessmentSummary, CompletedItem};
use crate::models::profile::ProfileSnapshot;

/// Read/write access to a user's live profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the user's profile, or an empty default when the user
    /// has never saved one (the caller decides whether that is an
    /// error — assessment creation rejects profiles with no skills).
    async fn get_profile(&self, user_id: Uuid) -> Result<ProfileSnapshot, AppError>;

    async fn put_profile(&self, user_id: Uuid, snapshot: &ProfileSnapshot)
        -> Result<(), AppError>;
}

/// Persistence for assessments. All lookups are scoped by owner:
/// another user's assessment behaves exactly like a missing one.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn insert(&self, assessment: &Assessment) -> Result<(), AppError>;

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Assessment>, AppError>;

    /// Newest-first summaries with the profile snapshot omitted.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AssessmentSummary>, AppError>;

    /// Replaces the completed-items list wholesale (read-modify-write;
    /// concurrent toggles are last-write-wins).
    async fn save_completed_items(
        &self,
        id: Uuid,
        user_id: Uuid,
        items: &[CompletedItem],
    ) -> Result<(), AppError>;

    /// Returns false when nothing matched (absent or not owned).
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError>;
}
