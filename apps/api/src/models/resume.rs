use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a resume within a ranking batch.
/// Either caller-provided (number or string) or the positional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResumeId {
    Number(u64),
    Text(String),
}

impl From<usize> for ResumeId {
    fn from(index: usize) -> Self {
        ResumeId::Number(index as u64)
    }
}

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumeId::Number(n) => write!(f, "{n}"),
            ResumeId::Text(s) => f.write_str(s),
        }
    }
}

/// A single work experience entry. Its content is opaque to ranking;
/// only the number of entries contributes to the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceEntry(pub Value);

/// Structured resume fields, as produced by the upstream resume extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResumeId>,
    pub applicant_name: String,
    #[serde(default)]
    pub highest_level_of_education: String,
    #[serde(default)]
    pub area_of_study: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experiences: Vec<ExperienceEntry>,
}

impl ResumeRecord {
    /// Returns the caller-provided id, or the resume's position in the batch.
    pub fn resolved_id(&self, index: usize) -> ResumeId {
        self.id.clone().unwrap_or_else(|| ResumeId::from(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_deserializes_with_opaque_experiences() {
        let json = r#"{
            "applicant_name": "Jane Doe",
            "highest_level_of_education": "University",
            "area_of_study": "Software Engineer",
            "institution": "State University",
            "skills": ["HTML", "CSS"],
            "experiences": [{"duration": "10 - 12/2022"}, {"duration": "1-2/2023"}]
        }"#;
        let resume: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(resume.experiences.len(), 2);
        assert_eq!(resume.skills, vec!["HTML", "CSS"]);
        assert!(resume.id.is_none());
    }

    #[test]
    fn test_resolved_id_falls_back_to_position() {
        let resume = ResumeRecord::default();
        assert_eq!(resume.resolved_id(3), ResumeId::Number(3));
    }

    #[test]
    fn test_resolved_id_prefers_provided_id() {
        let resume: ResumeRecord =
            serde_json::from_str(r#"{"id": "cv-42", "applicant_name": "A"}"#).unwrap();
        assert_eq!(resume.resolved_id(0), ResumeId::Text("cv-42".to_string()));
        assert_eq!(resume.resolved_id(0).to_string(), "cv-42");
    }

    #[test]
    fn test_numeric_id_round_trips_as_number() {
        let resume: ResumeRecord =
            serde_json::from_str(r#"{"id": 7, "applicant_name": "A"}"#).unwrap();
        assert_eq!(resume.id, Some(ResumeId::Number(7)));
        assert_eq!(serde_json::to_value(&resume).unwrap()["id"], 7);
    }
}
