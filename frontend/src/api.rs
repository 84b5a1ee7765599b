use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::{AnalysisEntry, AnalysisResponse, ModelInfo};

/// Uploads one image to the inference endpoint and returns its analysis.
pub async fn analyze_file(file: &GlooFile) -> Result<AnalysisEntry, String> {
    let form_data = web_sys::FormData::new().map_err(|_| "Failed to create form data".to_string())?;
    let web_file: &web_sys::File = file.as_ref();
    form_data
        .append_with_blob_and_filename("image", web_file, &file.name())
        .map_err(|_| "Failed to attach image to form".to_string())?;

    let request = Request::post("/api/inference")
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?;

    let response = request
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Server error: {} - {}", status, body));
    }

    let parsed = response
        .json::<AnalysisResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    parsed
        .results
        .into_iter()
        .next()
        .ok_or_else(|| "Server returned no results".to_string())
}

pub async fn fetch_model_info() -> Result<ModelInfo, String> {
    let response = Request::get("/api/model")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }
    response
        .json::<ModelInfo>()
        .await
        .map_err(|e| format!("Failed to parse model info: {}", e))
}
