use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Validated gap-analysis output from the generation model.
///
/// Validation is deliberately shallow: the six top-level fields must be
/// present, but their inner shapes are stored as raw JSON and passed
/// through untouched. A skill gap missing its `priority`, say, is kept
/// as-is rather than rejected — the model output is advisory content,
/// not a strict contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub summary: Value,
    pub skill_gaps: Value,
    pub recommended_certifications: Value,
    pub project_suggestions: Value,
    pub resume_tips: Value,
    pub interview_tips: Value,
}

/// The five checklist sections, in display order, paired with the
/// category key used by completed items.
pub const CATEGORIES: [&str; 5] = ["skill", "cert", "project", "resume", "interview"];

impl AssessmentResult {
    /// Top-level fields the parser requires, in wire form.
    pub const REQUIRED_FIELDS: [&'static str; 6] = [
        "summary",
        "skillGaps",
        "recommendedCertifications",
        "projectSuggestions",
        "resumeTips",
        "interviewTips",
    ];

    /// The result array backing a checklist category, if the category
    /// is one of the five known section keys.
    pub fn section(&self, category: &str) -> Option<&Value> {
        match category {
            "skill" => Some(&self.skill_gaps),
            "cert" => Some(&self.recommended_certifications),
            "project" => Some(&self.project_suggestions),
            "resume" => Some(&self.resume_tips),
            "interview" => Some(&self.interview_tips),
            _ => None,
        }
    }

    /// Number of items in one checklist section. Non-array values
    /// (permitted by shallow validation) count as zero.
    pub fn section_len(&self, category: &str) -> usize {
        self.section(category)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Total checklist items across all five sections.
    pub fn total_item_count(&self) -> usize {
        CATEGORIES.iter().map(|c| self.section_len(c)).sum()
    }
}

/// One checklist entry the user has marked done.
///
/// `category` and `item` are free-form strings on the wire: `item` is
/// the positional index (as a string) into the section array, and an
/// unknown category simply never matches a displayed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedItem {
    pub category: String,
    pub item: String,
    pub completed_at: DateTime<Utc>,
}

/// A persisted assessment: frozen profile snapshot, target role, the
/// validated result, and the user's completion checklist.
///
/// `result` and `profile_snapshot` never change after creation; only
/// `completed_items` mutates, through the progress toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_role: String,
    pub profile_snapshot: crate::models::profile::ProfileSnapshot,
    pub result: AssessmentResult,
    pub completed_items: Vec<CompletedItem>,
    pub created_at: DateTime<Utc>,
}

/// List-view projection of an assessment with the profile snapshot
/// omitted (it is bulky and unused on the dashboard).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_role: String,
    pub result: AssessmentResult,
    pub completed_items: Vec<CompletedItem>,
    pub created_at: DateTime<Utc>,
}
