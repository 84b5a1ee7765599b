use actix_files::Files;
use actix_multipart::{Multipart, MultipartError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::Utc;
use futures::TryStreamExt;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use shared::{treatment_plan, AnalysisEntry, InferenceResponse, TreatmentPlan, TumorClass, MAX_FILES};
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

use crate::cache::cache_service::CacheService;
use crate::config::ServerConfig;
use crate::inference::error::InferenceError;
use crate::inference::model::{image_hash, Model};
use crate::inference::preprocess::validate_size;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No image files found in upload")]
    NoImages,
    #[error("Too many images in one upload (limit {0})")]
    TooManyImages(usize),
    #[error("Unknown class label: {0}")]
    UnknownLabel(String),
    #[error("No cached result for image {0}")]
    ResultNotFound(String),
    #[error("Invalid multipart payload: {0}")]
    Multipart(#[from] MultipartError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoImages | ApiError::TooManyImages(_) | ApiError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnknownLabel(_) | ApiError::ResultNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// One analyzed upload plus the care plan for its predicted class.
#[derive(Serialize)]
struct AnalysisReport {
    #[serde(flatten)]
    entry: AnalysisEntry,
    treatment: Option<&'static TreatmentPlan>,
}

impl AnalysisReport {
    fn new(entry: AnalysisEntry) -> Self {
        let treatment = entry.inference.as_ref().map(|inf| treatment_plan(inf.predicted));
        Self { entry, treatment }
    }
}

struct Upload {
    file_name: String,
    size: usize,
    data: Vec<u8>,
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/inference").route(web::post().to(handle_inference)))
        .service(web::resource("/api/classes").route(web::get().to(list_classes)))
        .service(web::resource("/api/treatments/{label}").route(web::get().to(get_treatment)))
        .service(web::resource("/api/model").route(web::get().to(model_info)))
        .service(web::resource("/api/results").route(web::get().to(list_results)))
        .service(
            web::resource("/api/results/{image_hash}")
                .route(web::get().to(get_result))
                .route(web::delete().to(delete_result)),
        )
        .service(web::resource("/api/health").route(web::get().to(health)));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    cfg.service(Files::new("/static", frontend_dir.clone()))
        .service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn handle_inference(
    model: web::Data<Model>,
    cache: web::Data<CacheService>,
    server: web::Data<ServerConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let limit = server.max_upload_bytes;
    let mut uploads = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        // Plain form values carry no filename and are skipped.
        let Some(file_name) = file_name else {
            while field.try_next().await?.is_some() {}
            continue;
        };
        if uploads.len() == MAX_FILES {
            return Err(ApiError::TooManyImages(MAX_FILES));
        }

        // Oversized fields are drained but not buffered past the limit.
        let mut data = Vec::new();
        let mut size = 0usize;
        while let Some(chunk) = field.try_next().await? {
            size += chunk.len();
            if size <= limit {
                data.extend_from_slice(&chunk);
            }
        }
        uploads.push(Upload { file_name, size, data });
    }

    if uploads.is_empty() {
        return Err(ApiError::NoImages);
    }

    let mut results = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let entry = analyze_upload(&model, &cache, upload, limit).await;
        results.push(AnalysisReport::new(entry));
    }

    Ok(HttpResponse::Ok().json(json!({ "results": results })))
}

async fn analyze_upload(
    model: &web::Data<Model>,
    cache: &CacheService,
    upload: Upload,
    limit: usize,
) -> AnalysisEntry {
    let Upload { file_name, size, data } = upload;
    let mut entry = AnalysisEntry {
        id: Uuid::new_v4(),
        file_name,
        file_size: size,
        analyzed_at: Utc::now(),
        cached: false,
        inference: None,
        error: None,
    };

    if let Err(e) = validate_size(size, limit) {
        warn!("Rejected {}: {}", entry.file_name, e);
        entry.error = Some(e.to_string());
        return entry;
    }

    let hash = image_hash(&data);
    if let Some(response) = cache.get_cached_inference(&hash).await {
        info!("Cache hit for {} ({})", entry.file_name, hash);
        entry.cached = true;
        entry.inference = Some(response);
        return entry;
    }

    let model = model.clone();
    let outcome: Result<InferenceResponse, InferenceError> =
        match web::block(move || model.analyze(&data)).await {
            Ok(result) => result,
            Err(e) => Err(InferenceError::Model(format!("inference worker failed: {}", e))),
        };

    match outcome {
        Ok(response) => {
            info!(
                "Predicted {} for {} with {:.1}% confidence",
                response.predicted, entry.file_name, response.confidence
            );
            cache.cache_inference_result(&entry.file_name, &response).await;
            entry.inference = Some(response);
        }
        Err(e) if e.is_client_error() => {
            warn!("Rejected {}: {}", entry.file_name, e);
            entry.error = Some(e.to_string());
        }
        Err(e) => {
            let error_msg = format!("Model inference error: {}", e);
            error!("{} ({})", error_msg, entry.file_name);
            entry.error = Some(error_msg);
        }
    }
    entry
}

async fn list_classes() -> HttpResponse {
    let classes: Vec<_> = TumorClass::ALL
        .iter()
        .map(|class| {
            json!({
                "label": class,
                "display_name": class.display_name(),
                "is_tumor": class.is_tumor(),
            })
        })
        .collect();
    HttpResponse::Ok().json(classes)
}

async fn get_treatment(path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let label = path.into_inner();
    let class = TumorClass::from_str(&label).map_err(|_| ApiError::UnknownLabel(label))?;
    Ok(HttpResponse::Ok().json(treatment_plan(class)))
}

async fn model_info(model: web::Data<Model>) -> HttpResponse {
    HttpResponse::Ok().json(model.info())
}

async fn list_results(cache: web::Data<CacheService>) -> HttpResponse {
    HttpResponse::Ok().json(cache.get_cache_history().await)
}

async fn get_result(
    cache: web::Data<CacheService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let image_hash = path.into_inner();
    match cache.get_entry(&image_hash).await {
        Some(entry) => {
            let treatment = treatment_plan(entry.response.predicted);
            Ok(HttpResponse::Ok().json(json!({ "entry": entry, "treatment": treatment })))
        }
        None => Err(ApiError::ResultNotFound(image_hash)),
    }
}

async fn delete_result(
    cache: web::Data<CacheService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let image_hash = path.into_inner();
    if cache.delete_cached_inference(&image_hash).await {
        info!("Deleted cached result {}", image_hash);
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::ResultNotFound(image_hash))
    }
}

async fn health(model: web::Data<Model>, cache: web::Data<CacheService>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "engine": model.info().engine,
        "cached_results": cache.len().await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::model::tests::fixed_model;
    use crate::inference::preprocess::tests::png;
    use actix_web::http::header;
    use actix_web::{test, App};
    use serde_json::Value;
    use std::sync::atomic::Ordering;

    const BOUNDARY: &str = "----mri-test-boundary";

    fn multipart_body(files: &[(&str, &[u8])]) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for (name, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), body)
    }

    fn upload_request(files: &[(&str, &[u8])]) -> test::TestRequest {
        let (content_type, body) = multipart_body(files);
        test::TestRequest::post()
            .uri("/api/inference")
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
    }

    fn server_config(max_upload_bytes: usize) -> ServerConfig {
        ServerConfig {
            max_upload_bytes,
            ..ServerConfig::default()
        }
    }

    macro_rules! test_app {
        ($model:expr, $cache:expr, $limit:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($model))
                    .app_data(web::Data::new($cache))
                    .app_data(web::Data::new(server_config($limit)))
                    .configure(configure_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn inference_returns_class_confidence_and_treatment() {
        let (model, _) = fixed_model(vec![0.9, 0.05, 0.03, 0.02]);
        let app = test_app!(model, CacheService::new(8), 1024 * 1024);

        let image = png(300, 240);
        let body: Value = test::call_and_read_body_json(&app, upload_request(&[("scan.png", &image[..])]).to_request()).await;

        let result = &body["results"][0];
        assert_eq!(result["file_name"], "scan.png");
        assert_eq!(result["cached"], false);
        assert_eq!(result["inference"]["predicted"], "glioma");
        let confidence = result["inference"]["confidence"].as_f64().unwrap();
        assert!((confidence - 90.0).abs() < 1e-3);
        assert_eq!(result["treatment"]["title"], "Glioma Treatment Plan");
        assert_eq!(result["treatment"]["steps"].as_array().unwrap().len(), 5);
        assert!(result["error"].is_null());
    }

    #[actix_web::test]
    async fn failures_are_reported_per_image() {
        let (model, calls) = fixed_model(vec![0.1, 0.1, 0.7, 0.1]);
        let app = test_app!(model, CacheService::new(8), 4096);

        let small = png(16, 16);
        let large = vec![0u8; 5000];
        let req = upload_request(&[
            ("ok.png", &small[..]),
            ("notes.txt", &b"plain text"[..]),
            ("huge.png", &large[..]),
        ])
        .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);

        assert_eq!(results[0]["inference"]["predicted"], "notumor");
        assert_eq!(results[0]["treatment"]["title"], "No Tumor Detected - Preventive Care Plan");

        assert!(results[1]["inference"].is_null());
        assert!(results[1]["error"].as_str().unwrap().contains("Unsupported image format"));
        assert!(results[1]["treatment"].is_null());

        assert!(results[2]["error"].as_str().unwrap().contains("too large"));
        assert_eq!(results[2]["file_size"], 5000);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn empty_file_gets_its_own_error_entry() {
        let (model, calls) = fixed_model(vec![0.1, 0.1, 0.1, 0.7]);
        let app = test_app!(model, CacheService::new(8), 4096);

        let small = png(16, 16);
        let req = upload_request(&[("ok.png", &small[..]), ("empty.png", &b""[..])]).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["inference"]["predicted"], "pituitary");
        assert_eq!(results[1]["file_name"], "empty.png");
        assert_eq!(results[1]["file_size"], 0);
        assert!(results[1]["inference"].is_null());
        assert_eq!(results[1]["error"], "Image is empty");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let req = upload_request(&[("empty.png", &b""[..])]).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["results"][0]["error"], "Image is empty");
    }

    #[actix_web::test]
    async fn uploads_beyond_the_file_cap_are_rejected() {
        let (model, calls) = fixed_model(vec![0.25; 4]);
        let app = test_app!(model, CacheService::new(8), 4096);

        let small = png(8, 8);
        let names: Vec<String> = (0..=MAX_FILES).map(|i| format!("scan-{i}.png")).collect();
        let files: Vec<(&str, &[u8])> = names.iter().map(|n| (n.as_str(), &small[..])).collect();
        let resp = test::call_service(&app, upload_request(&files).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("Too many images"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let files = &files[..MAX_FILES];
        let body: Value = test::call_and_read_body_json(&app, upload_request(files).to_request()).await;
        assert_eq!(body["results"].as_array().unwrap().len(), MAX_FILES);
    }

    #[actix_web::test]
    async fn repeated_upload_is_served_from_cache() {
        let (model, calls) = fixed_model(vec![0.1, 0.6, 0.2, 0.1]);
        let cache = CacheService::new(8);
        let app = test_app!(model, cache.clone(), 1024 * 1024);
        let image = png(64, 64);

        let first: Value = test::call_and_read_body_json(&app, upload_request(&[("a.png", &image[..])]).to_request()).await;
        let second: Value = test::call_and_read_body_json(&app, upload_request(&[("b.png", &image[..])]).to_request()).await;

        assert_eq!(first["results"][0]["cached"], false);
        assert_eq!(second["results"][0]["cached"], true);
        assert_eq!(second["results"][0]["inference"]["predicted"], "meningioma");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let hash = first["results"][0]["inference"]["image_hash"].as_str().unwrap().to_string();
        let req = test::TestRequest::get().uri(&format!("/api/results/{hash}")).to_request();
        let stored: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stored["entry"]["file_name"], "a.png");
        assert_eq!(stored["treatment"]["title"], "Meningioma Treatment Plan");

        let req = test::TestRequest::get().uri("/api/results").to_request();
        let history: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history.as_array().unwrap().len(), 1);

        let req = test::TestRequest::delete().uri(&format!("/api/results/{hash}")).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
        let req = test::TestRequest::get().uri(&format!("/api/results/{hash}")).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn upload_without_images_is_a_bad_request() {
        let (model, _) = fixed_model(vec![0.25; 4]);
        let app = test_app!(model, CacheService::new(8), 1024);

        let resp = test::call_service(&app, upload_request(&[]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn treatment_lookup_covers_every_label() {
        let (model, _) = fixed_model(vec![0.25; 4]);
        let app = test_app!(model, CacheService::new(8), 1024);

        for class in TumorClass::ALL {
            let req = test::TestRequest::get()
                .uri(&format!("/api/treatments/{class}"))
                .to_request();
            let plan: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(plan["title"], treatment_plan(class).title);
        }

        let req = test::TestRequest::get().uri("/api/treatments/astrocytoma").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn classes_model_and_health_endpoints() {
        let (model, _) = fixed_model(vec![0.25; 4]);
        let app = test_app!(model, CacheService::new(8), 1024);

        let req = test::TestRequest::get().uri("/api/classes").to_request();
        let classes: Value = test::call_and_read_body_json(&app, req).await;
        let labels: Vec<_> = classes
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["label"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(labels, shared::class_labels());
        assert_eq!(classes[2]["is_tumor"], false);

        let req = test::TestRequest::get().uri("/api/model").to_request();
        let info: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(info["input_size"], 128);
        assert_eq!(info["engine"], "fixed");

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let health: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(health["status"], "ok");
    }
}
