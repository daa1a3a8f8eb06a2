//! AI Gateway — runs one profile + target role through the generation
//! model and returns a validated result.
//!
//! The client is injected rather than constructed lazily inside the
//! gateway, which gives tests a seam to substitute a scripted fake.

use std::sync::Arc;

use tracing::debug;

use crate::assessment::parser::parse_result;
use crate::assessment::prompts::build_prompt;
use crate::errors::GenerationError;
use crate::llm_client::GenerationClient;
use crate::models::assessment::AssessmentResult;

#[derive(Clone)]
pub struct AiGateway {
    client: Arc<dyn GenerationClient>,
}

impl AiGateway {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Builds the prompt, makes the single upstream call, and parses
    /// the response. Any client failure surfaces as `Upstream`; parse
    /// and validation failures keep their own kinds.
    pub async fn analyze_profile(
        &self,
        snapshot: &crate::models::profile::ProfileSnapshot,
        job_role: &str,
    ) -> Result<AssessmentResult, GenerationError> {
        let prompt = build_prompt(snapshot, job_role);
        debug!("Built analysis prompt ({} chars)", prompt.len());

        let raw = self
            .client
            .generate(&prompt)
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        parse_result(&raw)
    }
}
