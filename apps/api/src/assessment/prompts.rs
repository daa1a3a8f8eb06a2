//! Prompt construction for the gap-analysis call.
//!
//! `build_prompt` is pure and total: empty or missing profile sections
//! render as explicit "None"/"N/A" placeholders so the model always
//! receives a complete, parseable instruction, and the exact output
//! contract (field names, nesting, priority values, minimum counts) is
//! embedded so the response is maximally likely to pass validation.

use crate::models::profile::ProfileSnapshot;

/// Gap-analysis prompt template.
/// Replace: {job_role}, {degree}, {branch}, {college}, {graduation_year},
///          {cgpa}, {skills}, {experience}, {projects}, {certifications}
const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert career counselor and placement advisor for college students in tech.

A student wants to prepare for the role of **{job_role}**.

Here is their current profile:

**Education:**
- Degree: {degree}
- Branch: {branch}
- College: {college}
- Graduation Year: {graduation_year}
- CGPA: {cgpa}

**Skills:** {skills}

**Experience:**
{experience}

**Projects:**
{projects}

**Certifications:**
{certifications}

Analyze the gap between this student's current profile and what is typically required for the role of "{job_role}". Provide a comprehensive, actionable assessment.

You MUST respond in EXACTLY this JSON format with no extra text before or after the JSON:
{
  "summary": "A 2-3 sentence overall assessment of the student's readiness",
  "skillGaps": [
    {
      "skill": "Skill name",
      "priority": "high | medium | low",
      "description": "Why this skill matters and how to learn it"
    }
  ],
  "recommendedCertifications": [
    {
      "name": "Certification name",
      "reason": "Why this certification helps for the target role"
    }
  ],
  "projectSuggestions": [
    {
      "name": "Project name",
      "description": "What to build and why it demonstrates relevant skills",
      "skills": ["skill1", "skill2"]
    }
  ],
  "resumeTips": [
    "Specific actionable tip for improving the resume for this role"
  ],
  "interviewTips": [
    "Specific actionable interview preparation tip for this role"
  ]
}

Provide at least 3 items for skillGaps, 2 for recommendedCertifications, 2 for projectSuggestions, 3 for resumeTips, and 3 for interviewTips. Tailor everything specifically to the "{job_role}" role and the student's current profile."#;

/// Builds the gap-analysis prompt for a profile snapshot and target role.
/// Pure and deterministic; never fails on incomplete profiles.
pub fn build_prompt(snapshot: &ProfileSnapshot, job_role: &str) -> String {
    let edu = &snapshot.education;

    let skills = if snapshot.skills.is_empty() {
        "None listed".to_string()
    } else {
        snapshot.skills.join(", ")
    };

    let experience = render_lines(snapshot.experience.iter().map(|e| {
        format!(
            "• {} at {} ({}): {}",
            e.title, e.company, e.duration, e.description
        )
    }));

    let projects = render_lines(snapshot.projects.iter().map(|p| {
        format!(
            "• {} [{}]: {}",
            p.name,
            p.tech_stack.join(", "),
            p.description
        )
    }));

    let certifications = render_lines(snapshot.certifications.iter().map(|c| {
        format!(
            "• {} — {} ({})",
            c.name,
            c.issuer,
            c.year.map_or_else(|| "N/A".to_string(), |y| y.to_string())
        )
    }));

    ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_role}", job_role)
        .replace("{degree}", or_na(&edu.degree))
        .replace("{branch}", or_na(&edu.branch))
        .replace("{college}", or_na(&edu.college))
        .replace(
            "{graduation_year}",
            &edu.graduation_year
                .map_or_else(|| "N/A".to_string(), |y| y.to_string()),
        )
        .replace(
            "{cgpa}",
            &edu.cgpa.map_or_else(|| "N/A".to_string(), |c| c.to_string()),
        )
        .replace("{skills}", &skills)
        .replace("{experience}", &experience)
        .replace("{projects}", &projects)
        .replace("{certifications}", &certifications)
}

/// Joins bullet lines, falling back to "None" for empty sections.
fn render_lines(lines: impl Iterator<Item = String>) -> String {
    let joined = lines.collect::<Vec<_>>().join("\n");
    if joined.is_empty() {
        "None".to_string()
    } else {
        joined
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}
