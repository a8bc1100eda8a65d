use crate::{
    error::{RelayError, Result},
    logger,
    models::{GenerationOutcome, GenerationRequest, HealthResponse, ResponseEnvelope, Upload},
    server::{upload, AppState},
};
use actix_web::{get, http::header, http::StatusCode, post, web, HttpRequest, HttpResponse};
use uuid::Uuid;

#[post("/parse-stats")]
pub async fn parse_stats(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> HttpResponse {
    let request_id = Uuid::new_v4().simple().to_string()[..8].to_string();
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let upload = match read_upload(content_type, payload, state.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(e) => {
            log::warn!("[req:{}] rejected upload: {}", request_id, e);
            return HttpResponse::build(status_for(&e))
                .json(ResponseEnvelope::failure(e.to_string()));
        }
    };

    log::info!(
        "[req:{}] received {} bytes ({})",
        request_id,
        upload.bytes.len(),
        upload.mime_type()
    );

    let request = GenerationRequest::new(state.prompt, upload);
    let mut timer = logger::timer(&format!("[req:{}] generation", request_id));
    let result = state.generator.generate(request).await;
    timer.stop();

    match &result {
        Ok(GenerationOutcome::Text(text)) => {
            log::info!("[req:{}] model returned {} chars", request_id, text.len())
        }
        Ok(GenerationOutcome::Empty) => log::warn!("[req:{}] model returned no text", request_id),
        Err(e) => log::error!("[req:{}] generation failed: {}", request_id, e),
    }

    respond(result)
}

#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        model: state.generator.model_id().to_string(),
    })
}

async fn read_upload(
    content_type: Option<&str>,
    payload: web::Payload,
    limit: usize,
) -> Result<Upload> {
    let boundary = upload::parse_boundary(content_type)?;
    let body = upload::read_body(payload, limit).await?;
    upload::read_upload(boundary, body).await
}

/// Maps a generation result onto the response envelope.
pub fn respond(result: Result<GenerationOutcome>) -> HttpResponse {
    match result {
        Ok(GenerationOutcome::Text(text)) => {
            HttpResponse::Ok().json(ResponseEnvelope::success(text))
        }
        Ok(GenerationOutcome::Empty) => {
            HttpResponse::InternalServerError().json(ResponseEnvelope::no_text())
        }
        Err(e) => {
            HttpResponse::InternalServerError().json(ResponseEnvelope::failure(e.to_string()))
        }
    }
}

fn status_for(error: &RelayError) -> StatusCode {
    match error {
        RelayError::UploadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        RelayError::UploadError(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::TextGenerator;
    use crate::server::routes;
    use crate::server::upload::tests::{multipart_body, multipart_content_type};
    use actix_web::{test as actix_test, App};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    const SCENARIO_A: &str = r#"[{"game":1,"jugador":"Aero","goles":2,"asistencias":1,"pases":15,"intercepciones":3,"salvadas":1,"puntaje":8}]"#;

    enum Reply {
        Text(&'static str),
        Empty,
        Fail(&'static str),
    }

    struct MockGenerator {
        reply: Reply,
        calls: Mutex<Vec<GenerationRequest>>,
    }

    impl MockGenerator {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<GenerationRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome> {
            self.calls.lock().unwrap().push(request);
            match self.reply {
                Reply::Text(text) => Ok(GenerationOutcome::Text(text.to_string())),
                Reply::Empty => Ok(GenerationOutcome::Empty),
                Reply::Fail(message) => Err(RelayError::ServiceError(message.to_string())),
            }
        }

        fn model_id(&self) -> &str {
            "mock-model"
        }
    }

    async fn post_upload(
        generator: Arc<MockGenerator>,
        content_type: Option<&str>,
        data: &[u8],
        limit: usize,
    ) -> (StatusCode, serde_json::Value) {
        let state = web::Data::new(AppState::new(generator, limit));
        let app = actix_test::init_service(App::new().app_data(state).configure(routes)).await;
        let req = actix_test::TestRequest::post()
            .uri("/parse-stats")
            .insert_header((header::CONTENT_TYPE, multipart_content_type()))
            .set_payload(multipart_body("file", content_type, data))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        let status = resp.status();
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_text_is_passed_through_verbatim() {
        let generator = MockGenerator::new(Reply::Text(SCENARIO_A));
        let png = vec![0u8; 10 * 1024];
        let (status, body) = post_upload(generator.clone(), None, &png, 1 << 20).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["data"], SCENARIO_A);
        assert!(body.get("error").is_none());

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].mime_type, "image/png");
        assert_eq!(calls[0].data, png);
        assert_eq!(calls[0].prompt, crate::prompt::STATS_PROMPT);
    }

    #[actix_web::test]
    async fn test_generation_error_is_reported() {
        let generator = MockGenerator::new(Reply::Fail("429 RESOURCE_EXHAUSTED - quota exceeded"));
        let (status, body) =
            post_upload(generator.clone(), Some("image/jpeg"), b"\xff\xd8\xff", 1 << 20).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["ok"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("429 RESOURCE_EXHAUSTED - quota exceeded"));
        assert_eq!(generator.calls()[0].mime_type, "image/jpeg");
    }

    #[actix_web::test]
    async fn test_empty_text_is_failure() {
        let generator = MockGenerator::new(Reply::Empty);
        let (status, body) = post_upload(generator, Some("image/png"), b"\x89PNG", 1 << 20).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({"ok": false, "error": "model returned no text"})
        );
    }

    #[actix_web::test]
    async fn test_oversized_upload_skips_generation() {
        let generator = MockGenerator::new(Reply::Text("[]"));
        let (status, body) = post_upload(generator.clone(), None, &[1u8; 4096], 1024).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["ok"], false);
        assert!(generator.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_missing_file_field_is_bad_request() {
        let generator = MockGenerator::new(Reply::Text("[]"));
        let state = web::Data::new(AppState::new(generator.clone(), 1 << 20));
        let app = actix_test::init_service(App::new().app_data(state).configure(routes)).await;
        let req = actix_test::TestRequest::post()
            .uri("/parse-stats")
            .insert_header((header::CONTENT_TYPE, multipart_content_type()))
            .set_payload(multipart_body("upload", Some("image/png"), b"\x89PNG"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["ok"], false);
        assert!(generator.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_declared_type_reaches_generator_unchanged() {
        let generator = MockGenerator::new(Reply::Text("[]"));
        let (status, _) =
            post_upload(generator.clone(), Some("IMAGE/JPEG"), b"\xff\xd8\xff", 1 << 20).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(generator.calls()[0].mime_type, "IMAGE/JPEG");
    }

    #[actix_web::test]
    async fn test_non_multipart_rejected_before_body_is_read() {
        let generator = MockGenerator::new(Reply::Text("[]"));
        let state = web::Data::new(AppState::new(generator.clone(), 16));
        let app = actix_test::init_service(App::new().app_data(state).configure(routes)).await;
        let req = actix_test::TestRequest::post()
            .uri("/parse-stats")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(vec![b' '; 4096])
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["ok"], false);
        assert!(generator.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_health_reports_model() {
        let state = web::Data::new(AppState::new(MockGenerator::new(Reply::Empty), 1024));
        let app = actix_test::init_service(App::new().app_data(state).configure(routes)).await;
        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({"status": "ok", "model": "mock-model"}));
    }
}
