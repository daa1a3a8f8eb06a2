//! Service layer — orchestrates stores, gateway, and progress tracking
//! behind the HTTP handlers.
//!
//! Creation flow: validate input → snapshot profile → one gateway call
//! → persist. The record is only written after generation and
//! validation both succeed, so a failed creation leaves nothing behind
//! and the whole request is safe to retry.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::assessment::gateway::AiGateway;
use crate::assessment::progress;
use crate::errors::AppError;
use crate::models::assessment::{Assessment, AssessmentSummary};
use crate::store::{AssessmentStore, ProfileStore};

/// Runs the full assessment-creation pipeline for one user and role.
pub async fn create_assessment(
    profiles: &dyn ProfileStore,
    store: &dyn AssessmentStore,
    gateway: &AiGateway,
    user_id: Uuid,
    job_role: &str,
) -> Result<Assessment, AppError> {
    let job_role = job_role.trim();
    if job_role.is_empty() {
        return Err(AppError::Validation("Job role is required".to_string()));
    }

    // Frozen copy: later profile edits never touch this assessment.
    let snapshot = profiles.get_profile(user_id).await?;
    if snapshot.skills.is_empty() {
        return Err(AppError::Validation(
            "Please complete your profile before running an assessment".to_string(),
        ));
    }

    let result = gateway.analyze_profile(&snapshot, job_role).await?;

    let assessment = Assessment {
        id: Uuid::new_v4(),
        user_id,
        job_role: job_role.to_string(),
        profile_snapshot: snapshot,
        result,
        completed_items: Vec::new(),
        created_at: Utc::now(),
    };

    store.insert(&assessment).await?;

    info!(
        "Created assessment {} for user {} (role: {}, {} checklist items)",
        assessment.id,
        user_id,
        assessment.job_role,
        assessment.result.total_item_count()
    );

    Ok(assessment)
}

pub async fn list_assessments(
    store: &dyn AssessmentStore,
    user_id: Uuid,
) -> Result<Vec<AssessmentSummary>, AppError> {
    store.list_for_user(user_id).await
}

pub async fn get_assessment(
    store: &dyn AssessmentStore,
    id: Uuid,
    user_id: Uuid,
) -> Result<Assessment, AppError> {
    store
        .find_by_id(id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assessment not found".to_string()))
}

/// Toggles one checklist pair and returns the updated assessment.
/// Idempotent: repeating the same call changes nothing and skips the
/// write.
pub async fn toggle_item(
    store: &dyn AssessmentStore,
    id: Uuid,
    user_id: Uuid,
    category: &str,
    item: &str,
    completed: bool,
) -> Result<Assessment, AppError> {
    let mut assessment = get_assessment(store, id, user_id).await?;

    let changed = progress::toggle(&mut assessment.completed_items, category, item, completed);
    if changed {
        store
            .save_completed_items(id, user_id, &assessment.completed_items)
            .await?;
    }

    Ok(assessment)
}

pub async fn delete_assessment(
    store: &dyn AssessmentStore,
    id: Uuid,
    user_id: Uuid,
) -> Result<(), AppError> {
    if !store.delete(id, user_id).await? {
        return Err(AppError::NotFound("Assessment not found".to_string()));
    }
    info!("Deleted assessment {id} for user {user_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::progress::completion_percentage;
    use crate::llm_client::{GenerationClient, LlmError};
    use crate::models::assessment::CompletedItem;
    use crate::models::profile::ProfileSnapshot;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // ── Fakes ───────────────────────────────────────────────────────

    /// Scripted generation client that counts calls.
    struct ScriptedClient {
        response: Result<String, String>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn ok(raw: impl Into<String>) -> Self {
            Self {
                response: Ok(raw.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err("503 from upstream".to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedClient {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().map_err(|message| LlmError::Api {
                status: 503,
                message,
            })
        }
    }

    #[derive(Default)]
    struct InMemoryProfiles {
        profiles: Mutex<HashMap<Uuid, ProfileSnapshot>>,
    }

    impl InMemoryProfiles {
        fn with(user_id: Uuid, snapshot: ProfileSnapshot) -> Self {
            let store = Self::default();
            store.profiles.lock().unwrap().insert(user_id, snapshot);
            store
        }
    }

    #[async_trait]
    impl ProfileStore for InMemoryProfiles {
        async fn get_profile(&self, user_id: Uuid) -> Result<ProfileSnapshot, AppError> {
            Ok(self
                .profiles
                .lock()
                .unwrap()
                .get(&user_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn put_profile(
            &self,
            user_id: Uuid,
            snapshot: &ProfileSnapshot,
        ) -> Result<(), AppError> {
            self.profiles
                .lock()
                .unwrap()
                .insert(user_id, snapshot.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct InMemoryAssessments {
        rows: Mutex<HashMap<Uuid, Assessment>>,
    }

    impl InMemoryAssessments {
        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AssessmentStore for InMemoryAssessments {
        async fn insert(&self, assessment: &Assessment) -> Result<(), AppError> {
            self.rows
                .lock()
                .unwrap()
                .insert(assessment.id, assessment.clone());
            Ok(())
        }

        async fn find_by_id(
            &self,
            id: Uuid,
            user_id: Uuid,
        ) -> Result<Option<Assessment>, AppError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .get(&id)
                .filter(|a| a.user_id == user_id)
                .cloned())
        }

        async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AssessmentSummary>, AppError> {
            let mut matching: Vec<Assessment> = self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|a| a.user_id == user_id)
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(matching
                .into_iter()
                .map(|a| AssessmentSummary {
                    id: a.id,
                    user_id: a.user_id,
                    job_role: a.job_role,
                    result: a.result,
                    completed_items: a.completed_items,
                    created_at: a.created_at,
                })
                .collect())
        }

        async fn save_completed_items(
            &self,
            id: Uuid,
            user_id: Uuid,
            items: &[CompletedItem],
        ) -> Result<(), AppError> {
            let mut rows = self.rows.lock().unwrap();
            let assessment = rows
                .get_mut(&id)
                .filter(|a| a.user_id == user_id)
                .ok_or_else(|| AppError::NotFound("Assessment not found".to_string()))?;
            assessment.completed_items = items.to_vec();
            Ok(())
        }

        async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
            let mut rows = self.rows.lock().unwrap();
            match rows.get(&id) {
                Some(a) if a.user_id == user_id => {
                    rows.remove(&id);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    // ── Fixtures ────────────────────────────────────────────────────

    fn python_profile() -> ProfileSnapshot {
        ProfileSnapshot {
            skills: vec!["Python".to_string()],
            ..Default::default()
        }
    }

    fn valid_response() -> String {
        json!({
            "summary": "Promising start for data science.",
            "skillGaps": [
                {"skill": "Pandas", "priority": "high", "description": "d"},
                {"skill": "Statistics", "priority": "high", "description": "d"},
                {"skill": "ML basics", "priority": "medium", "description": "d"}
            ],
            "recommendedCertifications": [
                {"name": "TensorFlow Developer", "reason": "r"},
                {"name": "AWS ML Specialty", "reason": "r"}
            ],
            "projectSuggestions": [
                {"name": "Churn model", "description": "d", "skills": ["Python"]},
                {"name": "Dashboard", "description": "d", "skills": ["SQL"]}
            ],
            "resumeTips": ["t1", "t2", "t3"],
            "interviewTips": ["t1", "t2", "t3"]
        })
        .to_string()
    }

    // ── Creation scenarios ──────────────────────────────────────────

    #[tokio::test]
    async fn test_create_assessment_happy_path() {
        let user_id = Uuid::new_v4();
        let profiles = InMemoryProfiles::with(user_id, python_profile());
        let store = InMemoryAssessments::default();
        let client = Arc::new(ScriptedClient::ok(valid_response()));
        let gateway = AiGateway::new(client.clone());

        let assessment =
            create_assessment(&profiles, &store, &gateway, user_id, "Data Scientist")
                .await
                .unwrap();

        assert_eq!(client.call_count(), 1);
        assert_eq!(assessment.job_role, "Data Scientist");
        assert_eq!(assessment.profile_snapshot.skills, vec!["Python"]);
        assert!(assessment.completed_items.is_empty());
        assert_eq!(assessment.result.total_item_count(), 13);
        assert_eq!(
            completion_percentage(&assessment.result, &assessment.completed_items),
            0
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_job_role_rejected_before_gateway_call() {
        let user_id = Uuid::new_v4();
        let profiles = InMemoryProfiles::with(user_id, python_profile());
        let store = InMemoryAssessments::default();
        let client = Arc::new(ScriptedClient::ok(valid_response()));
        let gateway = AiGateway::new(client.clone());

        let err = create_assessment(&profiles, &store, &gateway, user_id, "   ")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(client.call_count(), 0);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_profile_without_skills_rejected() {
        let user_id = Uuid::new_v4();
        let profiles = InMemoryProfiles::default(); // no profile saved at all
        let store = InMemoryAssessments::default();
        let client = Arc::new(ScriptedClient::ok(valid_response()));
        let gateway = AiGateway::new(client.clone());

        let err = create_assessment(&profiles, &store, &gateway, user_id, "SRE")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_leaves_no_partial_record() {
        let user_id = Uuid::new_v4();
        let profiles = InMemoryProfiles::with(user_id, python_profile());
        let store = InMemoryAssessments::default();
        let gateway = AiGateway::new(Arc::new(ScriptedClient::failing()));

        let err = create_assessment(&profiles, &store, &gateway, user_id, "SRE")
            .await
            .unwrap_err();

        match err {
            AppError::Generation(e) => assert_eq!(e.kind(), "upstream"),
            other => panic!("expected generation error, got {other:?}"),
        }
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_response_leaves_no_partial_record() {
        let user_id = Uuid::new_v4();
        let profiles = InMemoryProfiles::with(user_id, python_profile());
        let store = InMemoryAssessments::default();
        let gateway = AiGateway::new(Arc::new(ScriptedClient::ok("I refuse to answer.")));

        let err = create_assessment(&profiles, &store, &gateway, user_id, "SRE")
            .await
            .unwrap_err();

        match err {
            AppError::Generation(e) => assert_eq!(e.kind(), "parse"),
            other => panic!("expected generation error, got {other:?}"),
        }
        assert_eq!(store.len(), 0);
    }

    // ── Read / toggle / delete scenarios ────────────────────────────

    async fn seeded(
        user_id: Uuid,
    ) -> (InMemoryProfiles, InMemoryAssessments, AiGateway, Assessment) {
        let profiles = InMemoryProfiles::with(user_id, python_profile());
        let store = InMemoryAssessments::default();
        let gateway = AiGateway::new(Arc::new(ScriptedClient::ok(valid_response())));
        let assessment = create_assessment(&profiles, &store, &gateway, user_id, "Data Scientist")
            .await
            .unwrap();
        (profiles, store, gateway, assessment)
    }

    #[tokio::test]
    async fn test_get_assessment_scoped_to_owner() {
        let user_id = Uuid::new_v4();
        let (_, store, _, assessment) = seeded(user_id).await;

        assert!(get_assessment(&store, assessment.id, user_id).await.is_ok());

        let err = get_assessment(&store, assessment.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_omits_snapshot() {
        let user_id = Uuid::new_v4();
        let profiles = InMemoryProfiles::with(user_id, python_profile());
        let store = InMemoryAssessments::default();
        let gateway = AiGateway::new(Arc::new(ScriptedClient::ok(valid_response())));

        let first = create_assessment(&profiles, &store, &gateway, user_id, "Role A")
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = create_assessment(&profiles, &store, &gateway, user_id, "Role B")
            .await
            .unwrap();

        let listed = list_assessments(&store, user_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        // Summaries carry no snapshot field at all.
        let value = serde_json::to_value(&listed[0]).unwrap();
        assert!(value.get("profileSnapshot").is_none());
    }

    #[tokio::test]
    async fn test_toggle_item_round_trip() {
        let user_id = Uuid::new_v4();
        let (_, store, _, assessment) = seeded(user_id).await;

        let updated = toggle_item(&store, assessment.id, user_id, "skill", "0", true)
            .await
            .unwrap();
        assert_eq!(updated.completed_items.len(), 1);

        // Repeat is a no-op.
        let repeated = toggle_item(&store, assessment.id, user_id, "skill", "0", true)
            .await
            .unwrap();
        assert_eq!(repeated.completed_items.len(), 1);

        let cleared = toggle_item(&store, assessment.id, user_id, "skill", "0", false)
            .await
            .unwrap();
        assert!(cleared.completed_items.is_empty());

        let persisted = get_assessment(&store, assessment.id, user_id).await.unwrap();
        assert!(persisted.completed_items.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_item_on_missing_assessment_is_not_found() {
        let store = InMemoryAssessments::default();
        let err = toggle_item(&store, Uuid::new_v4(), Uuid::new_v4(), "skill", "0", true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_assessment_scoped_to_owner() {
        let user_id = Uuid::new_v4();
        let (_, store, _, assessment) = seeded(user_id).await;

        let err = delete_assessment(&store, assessment.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.len(), 1);

        delete_assessment(&store, assessment.id, user_id)
            .await
            .unwrap();
        assert_eq!(store.len(), 0);

        // Deleting again reports not found.
        let err = delete_assessment(&store, assessment.id, user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
