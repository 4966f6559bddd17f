//! Lexical Scorer — TF-IDF over unigrams and bigrams, cosine against the job vector.
//!
//! The vector space is fitted over the job text plus every resume text of a
//! single call. Scores are therefore relative to the candidate pool: the same
//! resume can score differently when ranked against a different pool.

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;
use regex::Regex;

use crate::ranking::stop_words::english_stop_words;
use crate::ranking::RankingError;

pub const BACKEND_NAME: &str = "tfidf";

/// Two or more word characters, same as the classic vectorizer default.
const TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse row: `(term index, weight)` sorted by term index.
pub type SparseVector = Vec<(usize, f64)>;

/// Vocabulary and IDF weights learned from one batch of documents.
#[derive(Debug, Clone, Default)]
pub struct TfidfModel {
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
}

pub struct LexicalScorer {
    token_pattern: Regex,
    stop_words: HashSet<String>,
    min_n: usize,
    max_n: usize,
}

impl LexicalScorer {
    /// Builds a scorer for the given inclusive n-gram range.
    /// An empty or inverted range is a backend configuration error.
    pub fn new(ngram_range: (usize, usize)) -> Result<Self, RankingError> {
        let (min_n, max_n) = ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(RankingError::backend(
                BACKEND_NAME,
                format!("invalid n-gram range ({min_n}, {max_n})"),
            ));
        }

        let token_pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| RankingError::backend(BACKEND_NAME, e.to_string()))?;

        Ok(Self {
            token_pattern,
            stop_words: english_stop_words(),
            min_n,
            max_n,
        })
    }

    /// Scorer with unigrams and bigrams.
    pub fn with_defaults() -> Result<Self, RankingError> {
        Self::new((1, 2))
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        (self.min_n, self.max_n)
    }

    /// Cosine similarity between the job text and each resume text, in input order.
    pub fn score(&self, job_text: &str, resume_texts: &[String]) -> Vec<f64> {
        if resume_texts.is_empty() {
            return Vec::new();
        }

        let mut documents: Vec<&str> = Vec::with_capacity(resume_texts.len() + 1);
        documents.push(job_text);
        documents.extend(resume_texts.iter().map(String::as_str));

        let rows = self.fit_transform(&documents);
        let Some((job_row, resume_rows)) = rows.split_first() else {
            return Vec::new();
        };

        resume_rows
            .par_iter()
            .map(|row| cosine_similarity(job_row, row).clamp(0.0, 1.0))
            .collect()
    }

    /// Fits vocabulary and IDF over `documents` and returns one L2-normalised row per document.
    pub fn fit_transform(&self, documents: &[&str]) -> Vec<SparseVector> {
        let analyzed: Vec<Vec<String>> = documents.par_iter().map(|d| self.analyze(d)).collect();
        let model = self.fit(&analyzed);
        analyzed
            .par_iter()
            .map(|terms| transform(&model, terms))
            .collect()
    }

    fn fit(&self, analyzed: &[Vec<String>]) -> TfidfModel {
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in analyzed {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        // Smoothed IDF: ln((1 + n) / (1 + df)) + 1
        let n_docs = analyzed.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (index, (term, df)) in document_frequency.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), index);
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
        }

        TfidfModel { vocabulary, idf }
    }

    /// Lower-cases, tokenizes, drops stop words, then emits the n-grams in range.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let mut terms = Vec::new();
        for n in self.min_n..=self.max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

fn transform(model: &TfidfModel, terms: &[String]) -> SparseVector {
    let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
    for term in terms {
        if let Some(&index) = model.vocabulary.get(term) {
            *counts.entry(index).or_insert(0.0) += 1.0;
        }
    }

    let mut row: SparseVector = counts
        .into_iter()
        .map(|(index, tf)| (index, tf * model.idf[index]))
        .collect();

    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut row {
            *w /= norm;
        }
    }
    row
}

/// Cosine of two sparse rows sorted by index. A zero vector yields 0.
pub fn cosine_similarity(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let norm_a = a.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LexicalScorer {
        LexicalScorer::with_defaults().unwrap()
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_pool_returns_empty() {
        assert!(scorer().score("Frontend Developer", &[]).is_empty());
    }

    #[test]
    fn test_identical_text_scores_one() {
        let scores = scorer().score(
            "Rust developer distributed systems",
            &texts(&["Rust developer distributed systems", "Java accountant"]),
        );
        assert!((scores[0] - 1.0).abs() < 1e-9, "Score was {}", scores[0]);
    }

    #[test]
    fn test_no_shared_vocabulary_scores_zero() {
        let scores = scorer().score("ReactJS TypeScript", &texts(&["plumbing carpentry"]));
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_all_empty_texts_score_zero_without_nan() {
        let scores = scorer().score("", &texts(&["", "   "]));
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_stop_words_only_score_zero() {
        let scores = scorer().score("the and of", &texts(&["the and of"]));
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_more_overlap_scores_higher() {
        let scores = scorer().score(
            "Frontend Developer ReactJS TypeScript HTML CSS",
            &texts(&["Skills: ReactJS, TypeScript, HTML, CSS", "Skills: HTML, Excel"]),
        );
        assert!(scores[0] > scores[1], "Scores were {scores:?}");
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_analyze_drops_stop_words_before_bigrams() {
        let terms = scorer().analyze("Proficient in ReactJS");
        assert_eq!(terms, vec!["proficient", "reactjs", "proficient reactjs"]);
    }

    #[test]
    fn test_analyze_ignores_single_character_tokens() {
        let terms = scorer().analyze("C R Go");
        assert_eq!(terms, Vec::<String>::new()); // "go" is a stop word too
    }

    #[test]
    fn test_vocabulary_is_fitted_over_whole_batch() {
        let s = scorer();
        let rows = s.fit_transform(&["rust", "python", "rust python"]);
        assert_eq!(rows.len(), 3);
        // "rust", "python", "rust python"
        assert_eq!(rows[2].len(), 3);
        assert_eq!(rows[0].len(), 1);
    }

    #[test]
    fn test_score_depends_on_candidate_pool() {
        let s = scorer();
        let job = "rust kafka";
        let alone = s.score(job, &texts(&["rust"]))[0];
        let pooled = s.score(job, &texts(&["rust", "rust", "kafka"]))[0];
        assert!((alone - pooled).abs() > 1e-6, "{alone} vs {pooled}");
    }

    #[test]
    fn test_invalid_ngram_range_is_backend_error() {
        assert!(matches!(
            LexicalScorer::new((2, 1)),
            Err(RankingError::ScoringBackendUnavailable { .. })
        ));
        assert!(LexicalScorer::new((0, 1)).is_err());
    }

    #[test]
    fn test_cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[], &[(0, 1.0)]), 0.0);
    }
}
