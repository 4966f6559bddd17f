use serde::{Deserialize, Serialize};

/// Structured job description, as produced by the upstream JD extractor.
///
/// Skill and education collections are compared case-insensitively by the
/// field matcher; their order only affects the normalized text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub job_title: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Minimum years of experience.
    #[serde(default)]
    pub min_experience: u32,
    #[serde(default)]
    pub education_fields: Vec<String>,
}
