pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ranking::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ranking API
        .route(
            "/api/v1/resume-scores",
            post(handlers::handle_resume_scores),
        )
        .route(
            "/api/v1/resume-scores/weights",
            get(handlers::handle_default_weights),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::ranking::lexical::LexicalScorer;
    use crate::ranking::ranker::RankingService;
    use crate::ranking::semantic::{HashEmbedder, SemanticScorer};
    use crate::ranking::weights::WeightConfig;

    fn test_state() -> AppState {
        let ranker = RankingService::new(
            LexicalScorer::with_defaults().unwrap(),
            SemanticScorer::new(Arc::new(HashEmbedder::new(128).unwrap())),
            WeightConfig::default(),
        )
        .unwrap();
        AppState {
            ranker: Arc::new(ranker),
        }
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-ranker");
    }

    #[tokio::test]
    async fn test_resume_scores_ranks_all_candidates() {
        let payload = json!({
            "job_description": {
                "job_title": "Frontend Developer",
                "requirements": ["Proficient in ReactJS and TypeScript"],
                "required_skills": ["HTML", "CSS"],
                "min_experience": 1,
                "education_fields": ["computer science"]
            },
            "resumes": [
                {"applicant_name": "No Skills", "skills": [], "experiences": []},
                {"id": "cv-7", "applicant_name": "Both", "area_of_study": "Computer Science",
                 "skills": ["html", "css"], "experiences": [{"duration": "2022"}]}
            ]
        });
        let (status, body) = send(post_json("/api/v1/resume-scores", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Resume scores generated");

        let scores = body["scores"].as_array().unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0]["id"], "cv-7");
        assert_eq!(scores[0]["score_breakdown"]["skill_match"], 100.0);
        assert_eq!(scores[1]["id"], 0);
        assert_eq!(scores[1]["missing_skills"], json!(["CSS", "HTML"]));
    }

    #[tokio::test]
    async fn test_empty_resume_list_returns_empty_scores() {
        let payload = json!({
            "job_description": {"job_title": "Frontend Developer"},
            "resumes": []
        });
        let (status, body) = send(post_json("/api/v1/resume-scores", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scores"], json!([]));
    }

    #[tokio::test]
    async fn test_blank_job_title_is_validation_error() {
        let payload = json!({
            "job_description": {"job_title": ""},
            "resumes": [{"applicant_name": "A"}]
        });
        let (status, body) = send(post_json("/api/v1/resume-scores", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_job_title_is_unprocessable() {
        let payload = json!({
            "job_description": {"requirements": []},
            "resumes": []
        });
        let (status, body) = send(post_json("/api/v1/resume-scores", &payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resume-scores")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_negative_weight_is_rejected() {
        let payload = json!({
            "job_description": {"job_title": "Frontend Developer"},
            "resumes": [{"applicant_name": "A"}],
            "weights": {"skill": -0.5}
        });
        let (status, _) = send(post_json("/api/v1/resume-scores", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_weight_spellings_are_unprocessable() {
        let payload = json!({
            "job_description": {"job_title": "Frontend Developer"},
            "resumes": [{"applicant_name": "A"}],
            "weights": {"skill": 0.5, "skill_matching": 0.6}
        });
        let (status, body) = send(post_json("/api/v1/resume-scores", &payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("duplicate field `skill`"));
    }

    #[tokio::test]
    async fn test_default_weights_endpoint() {
        let request = Request::builder()
            .uri("/api/v1/resume-scores/weights")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weights"]["skill"], 0.45);
        assert_eq!(body["semantic_backend"], "hash");
    }
}
