use super::super::{FileData, Model, Msg, Page, MAX_FILES};
use super::utils::{generate_id, is_supported_image_type};
use crate::api;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::callback::Timeout;
use shared::AnalysisEntry;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

const THEME_KEY: &str = "mri-theme";

pub fn handle_navigate(model: &mut Model, page: Page) -> bool {
    if model.page == page {
        return false;
    }
    model.page = page;
    model.error = None;
    true
}

pub fn fetch_model_info(ctx: &Context<Model>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::fetch_model_info().await {
            Ok(info) => link.send_message(Msg::ModelInfoLoaded(info)),
            Err(e) => gloo_console::warn!(format!("Model info unavailable: {}", e)),
        }
    });
}

pub fn handle_files_added(model: &mut Model, ctx: &Context<Model>, files: Vec<GlooFile>) -> bool {
    let available_slots = MAX_FILES.saturating_sub(model.files.len());

    if files.len() > available_slots {
        model.error = Some(format!(
            "Upload limit exceeded. You can only add {} more images.",
            available_slots
        ));
        return true;
    }

    model.error = None;
    let mut new_selection = None;

    for file in files.into_iter() {
        let id = generate_id();
        model.files.insert(
            id,
            FileData {
                id,
                file: file.clone(),
                preview_url: None,
            },
        );

        let preview_url = ObjectUrl::from(file);
        ctx.link().send_message(Msg::AddPreview(id, preview_url));
        new_selection = Some(id);
    }

    if let Some(id) = new_selection {
        model.selected_file_id = Some(id);
    }
    true
}

pub fn handle_add_preview(model: &mut Model, id: u64, url: ObjectUrl) -> bool {
    match model.files.get_mut(&id) {
        Some(file_data) => {
            file_data.preview_url = Some(url);
            true
        }
        None => false,
    }
}

pub fn handle_remove_file(model: &mut Model, id: u64) -> bool {
    if model.files.remove(&id).is_none() {
        return false;
    }
    model.results.remove(&id);

    if model.files.is_empty() {
        model.selected_file_id = None;
        model.results.clear();
        model.error = None;
    } else if model.selected_file_id == Some(id) {
        model.selected_file_id = model.files.keys().max().copied();
    }
    true
}

pub fn handle_select_file(model: &mut Model, ctx: &Context<Model>, id: u64) -> bool {
    if model.selected_file_id == Some(id) || !model.files.contains_key(&id) {
        return false;
    }
    if let Some(timeout) = model.preview_load_timeout.take() {
        timeout.cancel();
    }

    model.selected_file_id = Some(id);
    model.error = None;
    model.preview_loading = true;

    let link = ctx.link().clone();
    model.preview_load_timeout = Some(Timeout::new(0, move || {
        link.send_message(Msg::PreviewLoaded);
    }));
    true
}

pub fn handle_clear_all_files(model: &mut Model) -> bool {
    for file_data in model.files.values_mut() {
        let _ = file_data.preview_url.take();
    }
    model.files.clear();
    model.selected_file_id = None;
    model.results.clear();
    model.error = None;
    true
}

pub fn handle_analyze_selected(model: &mut Model, ctx: &Context<Model>) -> bool {
    let selected = model
        .selected_file_id
        .and_then(|id| model.files.get(&id).map(|fd| (id, fd.file.clone())));

    match selected {
        Some((file_id, file)) => {
            model.loading = true;
            model.error = None;
            model.pending_requests = 1;
            send_analysis_request(ctx, file_id, file);
            true
        }
        None => {
            model.error = Some("No file selected for analysis.".into());
            true
        }
    }
}

pub fn handle_analyze_all(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.files.is_empty() {
        return false;
    }
    model.loading = true;
    model.error = None;
    model.pending_requests = model.files.len();

    for file_data in model.files.values() {
        send_analysis_request(ctx, file_data.id, file_data.file.clone());
    }
    true
}

pub fn handle_analysis_result(model: &mut Model, file_id: u64, entry: AnalysisEntry) -> bool {
    if let Some(error) = &entry.error {
        model.error = Some(format!("{}: {}", entry.file_name, error));
    }
    model.results.insert(file_id, entry);
    finish_request(model);
    true
}

pub fn handle_analysis_failed(model: &mut Model, error: String) -> bool {
    log::error!("Analysis request failed: {}", error);
    model.error = Some(error);
    finish_request(model);
    true
}

fn finish_request(model: &mut Model) {
    model.pending_requests = model.pending_requests.saturating_sub(1);
    if model.pending_requests == 0 {
        model.loading = false;
    }
}

pub fn handle_preview_loaded(model: &mut Model) -> bool {
    model.preview_loading = false;
    model.preview_load_timeout = None;
    true
}

pub fn stored_theme() -> String {
    LocalStorage::get::<String>(THEME_KEY).unwrap_or_else(|_| "light".to_string())
}

pub fn apply_theme(theme: &str) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let class_list = body.class_list();
    let _ = if theme == "dark" {
        class_list.add_1("dark-mode")
    } else {
        class_list.remove_1("dark-mode")
    };
}

pub fn handle_toggle_theme(model: &mut Model) -> bool {
    model.theme = if model.theme == "light" { "dark" } else { "light" }.to_string();
    apply_theme(&model.theme);
    if LocalStorage::set(THEME_KEY, &model.theme).is_err() {
        log::warn!("Could not persist theme preference");
    }
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file_list) = event.data_transfer().and_then(|dt| dt.files()) {
        process_file_list(ctx, file_list);
    }
    true
}

pub fn handle_paste(model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if model.page != Page::Detection {
        return false;
    }
    if let Some(file_list) = event.clipboard_data().and_then(|dt| dt.files()) {
        if file_list.length() > 0 {
            event.prevent_default();
            process_file_list(ctx, file_list);
            return true;
        }
    }
    false
}

pub fn process_file_list(ctx: &Context<Model>, file_list: FileList) {
    let mut files_to_process = Vec::new();

    for i in 0..file_list.length() {
        if let Some(file) = file_list.item(i) {
            if is_supported_image_type(&file.type_()) {
                files_to_process.push(GlooFile::from(file));
            } else {
                log::warn!("Skipping unsupported file: {}", file.name());
                ctx.link().send_message(Msg::SetError(Some(format!(
                    "Skipped {}: only JPG and PNG images are supported",
                    file.name()
                ))));
            }
        }
    }

    if !files_to_process.is_empty() {
        ctx.link().send_message(Msg::FilesAdded(files_to_process));
    }
}

pub fn send_analysis_request(ctx: &Context<Model>, file_id: u64, file: GlooFile) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::analyze_file(&file).await {
            Ok(entry) => link.send_message(Msg::AnalysisResult(file_id, entry)),
            Err(e) => link.send_message(Msg::AnalysisFailed(e)),
        }
    });
}
