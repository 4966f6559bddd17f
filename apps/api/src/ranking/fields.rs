//! Structured-Field Matcher — skill overlap, experience sufficiency, education field.
//!
//! Ratios with an empty or zero denominator resolve to fixed defaults instead
//! of failing: skill match 0, experience divides by at least 1, and an
//! unlisted area of study earns partial credit.

use std::collections::{BTreeSet, HashSet};

use crate::models::job::JobDescription;
use crate::models::resume::ResumeRecord;

/// Credit given when the resume's area of study is not among the job's fields.
pub const UNLISTED_EDUCATION_CREDIT: f64 = 0.5;

/// Field-level scores for one resume, each in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldScores {
    pub skill_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
    /// Required skills the resume covers, in the job's casing.
    pub matched_skills: BTreeSet<String>,
    /// Required skills the resume lacks, in the job's casing.
    pub missing_skills: BTreeSet<String>,
}

pub fn match_fields(jd: &JobDescription, resume: &ResumeRecord) -> FieldScores {
    let skills = match_skills(&jd.required_skills, &resume.skills);
    FieldScores {
        skill_match: skills.ratio,
        experience_match: experience_match(jd.min_experience, resume.experiences.len()),
        education_match: education_match(&jd.education_fields, &resume.area_of_study),
        matched_skills: skills.matched,
        missing_skills: skills.missing,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillMatch {
    pub ratio: f64,
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

/// |required ∩ resume| / |required|, compared case-insensitively.
///
/// Case-duplicates in `required` collapse to the first spelling seen.
pub fn match_skills(required: &[String], resume_skills: &[String]) -> SkillMatch {
    let have: HashSet<String> = resume_skills.iter().map(|s| s.to_lowercase()).collect();

    let mut seen = HashSet::new();
    let mut matched = BTreeSet::new();
    let mut missing = BTreeSet::new();
    for skill in required {
        if !seen.insert(skill.to_lowercase()) {
            continue;
        }
        if have.contains(&skill.to_lowercase()) {
            matched.insert(skill.clone());
        } else {
            missing.insert(skill.clone());
        }
    }

    let ratio = if seen.is_empty() {
        0.0
    } else {
        matched.len() as f64 / seen.len() as f64
    };

    SkillMatch {
        ratio,
        matched,
        missing,
    }
}

/// min(entries / max(min_years, 1), 1).
pub fn experience_match(min_experience: u32, entries: usize) -> f64 {
    let required = min_experience.max(1) as f64;
    (entries as f64 / required).min(1.0)
}

pub fn education_match(education_fields: &[String], area_of_study: &str) -> f64 {
    let area = area_of_study.to_lowercase();
    if education_fields.iter().any(|f| f.to_lowercase() == area) {
        1.0
    } else {
        UNLISTED_EDUCATION_CREDIT
    }
}
