use actix_files::Files;
use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use serde_json::json;
use shared::{ErrorResponse, CLASSIFICATION_FAILED_MESSAGE, CLASSIFY_ENDPOINT, NO_IMAGE_MESSAGE};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::upload::ImageUpload;

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(CLASSIFY_ENDPOINT).route(web::post().to(classify_image)))
        .service(web::resource("/api/health").route(web::get().to(health)));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn classify_image(
    upload: ImageUpload,
    classifier: web::Data<dyn Classifier>,
) -> HttpResponse {
    let request_id = Uuid::new_v4();

    let Some(image) = upload.image else {
        warn!("[{}] {}", request_id, NO_IMAGE_MESSAGE);
        return HttpResponse::BadRequest().json(ErrorResponse::new(NO_IMAGE_MESSAGE));
    };

    info!(
        "[{}] Classifying {} ({} bytes, {}) with {} classifier",
        request_id,
        image.display_name(),
        image.size(),
        image.content_type,
        classifier.name()
    );

    match classifier.classify(&image).await {
        Ok(result) => {
            info!(
                "[{}] Result: {} ({:.2}, {})",
                request_id, result.condition, result.confidence, result.severity
            );
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            error!("[{}] Classification failed: {}", request_id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::with_details(CLASSIFICATION_FAILED_MESSAGE, e.to_string()))
        }
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::catalog::Catalog;
    use crate::classifier::mock::{FixedSelector, MockClassifier, RandomSelector};
    use crate::classifier::ClassifierError;
    use crate::test_support::{file_part, finish, multipart_post, text_part};
    use crate::upload::{UploadConfig, UploadedImage};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::Value;
    use shared::{ClassificationResult, MAX_UPLOAD_BYTES};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const CONDITIONS: [&str; 4] = [
        "Melanoma",
        "Benign Nevus",
        "Seborrheic Keratosis",
        "Basal Cell Carcinoma",
    ];

    /// Delegates to an inner classifier and counts how often it ran.
    struct Counting<C> {
        inner: C,
        calls: AtomicUsize,
    }

    impl<C> Counting<C> {
        fn new(inner: C) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<C: Classifier> Classifier for Counting<C> {
        async fn classify(&self, image: &UploadedImage) -> Result<ClassificationResult, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.classify(image).await
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    struct Failing;

    #[async_trait]
    impl Classifier for Failing {
        async fn classify(&self, _image: &UploadedImage) -> Result<ClassificationResult, ClassifierError> {
            Err(ClassifierError::Unavailable("model offline".into()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn instant_mock() -> MockClassifier {
        MockClassifier::new(Catalog::builtin(), Duration::ZERO, Box::new(RandomSelector))
    }

    fn jpeg_body(size: usize) -> Vec<u8> {
        finish(file_part("image", "lesion.jpg", "image/jpeg", &vec![0xAB; size]))
    }

    macro_rules! app_with {
        ($classifier:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::from($classifier as Arc<dyn Classifier>))
                    .configure(configure_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn valid_image_returns_a_catalog_entry() {
        let app = app_with!(Arc::new(instant_mock()));
        let started: DateTime<Utc> = Utc::now();

        let req = multipart_post(CLASSIFY_ENDPOINT, jpeg_body(2 * 1024 * 1024)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert!(CONDITIONS.contains(&body["condition"].as_str().unwrap()));
        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&confidence));
        assert!(["low", "medium", "high"].contains(&body["severity"].as_str().unwrap()));
        assert!(body["description"].is_string());

        let timestamp = DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).unwrap();
        assert!(timestamp >= started);
    }

    #[actix_web::test]
    async fn response_shape_is_stable_across_calls() {
        let app = app_with!(Arc::new(instant_mock()));

        let mut key_sets = Vec::new();
        for _ in 0..5 {
            let req = multipart_post(CLASSIFY_ENDPOINT, jpeg_body(64)).to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            let mut keys: Vec<String> = body.as_object().unwrap().keys().cloned().collect();
            keys.sort();
            key_sets.push(keys);
        }

        assert!(key_sets.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(
            key_sets[0],
            ["condition", "confidence", "description", "severity", "timestamp"]
        );
    }

    #[actix_web::test]
    async fn fixed_selection_is_deterministic() {
        let classifier = MockClassifier::new(Catalog::builtin(), Duration::ZERO, Box::new(FixedSelector(3)));
        let app = app_with!(Arc::new(classifier));

        let req = multipart_post(CLASSIFY_ENDPOINT, jpeg_body(16)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["condition"], "Basal Cell Carcinoma");
        assert_eq!(body["severity"], "medium");
    }

    #[actix_web::test]
    async fn missing_file_is_a_bad_request() {
        let classifier = Arc::new(Counting::new(instant_mock()));
        let app = app_with!(classifier.clone());

        let req = multipart_post(CLASSIFY_ENDPOINT, finish(text_part("note", "no file"))).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "No image file provided" }));

        let req = test::TestRequest::post().uri(CLASSIFY_ENDPOINT).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert_eq!(classifier.calls(), 0);
    }

    #[actix_web::test]
    async fn non_image_is_rejected_before_classification() {
        let classifier = Arc::new(Counting::new(instant_mock()));
        let app = app_with!(classifier.clone());

        let body = finish(file_part("image", "report.pdf", "application/pdf", b"%PDF-1.7"));
        let resp = test::call_service(&app, multipart_post(CLASSIFY_ENDPOINT, body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Only image files are allowed");

        assert_eq!(classifier.calls(), 0);
    }

    #[actix_web::test]
    async fn exactly_the_limit_is_accepted() {
        let app = app_with!(Arc::new(instant_mock()));

        let req = multipart_post(CLASSIFY_ENDPOINT, jpeg_body(MAX_UPLOAD_BYTES)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn one_byte_over_the_limit_is_rejected() {
        let classifier = Arc::new(Counting::new(instant_mock()));
        let app = app_with!(classifier.clone());

        let req = multipart_post(CLASSIFY_ENDPOINT, jpeg_body(MAX_UPLOAD_BYTES + 1)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "File too large");

        assert_eq!(classifier.calls(), 0);
    }

    #[actix_web::test]
    async fn configured_limit_overrides_default() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(Arc::new(instant_mock()) as Arc<dyn Classifier>))
                .app_data(UploadConfig::new(1024))
                .configure(configure_api),
        )
        .await;

        let req = multipart_post(CLASSIFY_ENDPOINT, jpeg_body(1025)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[actix_web::test]
    async fn classifier_failure_is_a_server_error() {
        let app = app_with!(Arc::new(Failing));

        let req = multipart_post(CLASSIFY_ENDPOINT, jpeg_body(32)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to process image classification");
        assert!(body["details"].as_str().unwrap().contains("model offline"));
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = app_with!(Arc::new(instant_mock()));
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }
}
