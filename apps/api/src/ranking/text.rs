//! Text Normalizer — flattens structured records into comparable text blobs.
//!
//! Case and punctuation are left untouched; the lexical and semantic scorers
//! do their own folding.

use crate::models::job::JobDescription;
use crate::models::resume::ResumeRecord;

/// `"{job_title} {requirements...}"`.
pub fn job_text(jd: &JobDescription) -> String {
    format!("{} {}", jd.job_title, jd.requirements.join(" "))
        .trim()
        .to_string()
}

/// Name, education line, comma-joined skills and the number of experience
/// entries (their content is deliberately ignored).
pub fn resume_text(resume: &ResumeRecord) -> String {
    format!(
        "{}\nEducation: {} in {} at {}\nSkills: {}\nExperience: {} positions",
        resume.applicant_name,
        resume.highest_level_of_education,
        resume.area_of_study,
        resume.institution,
        resume.skills.join(", "),
        resume.experiences.len()
    )
}
