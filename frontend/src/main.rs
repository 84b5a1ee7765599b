mod api;
mod components;

use components::handlers;
use components::header::render_header;
use components::navigation::render_navigation;
use components::pages::{render_about, render_home};
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::theme_toggle::render_theme_toggle;
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::{AnalysisEntry, ModelInfo};
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

pub use shared::MAX_FILES;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Page {
    Home,
    Detection,
    About,
}

#[derive(Clone)]
pub struct FileData {
    pub id: u64,
    pub file: GlooFile,
    pub preview_url: Option<ObjectUrl>,
}

pub enum Msg {
    // Navigation
    Navigate(Page),
    ModelInfoLoaded(ModelInfo),

    // File operations
    FilesAdded(Vec<GlooFile>),
    AddPreview(u64, ObjectUrl),
    RemoveFile(u64),
    SelectFile(u64),
    ClearAllFiles,

    // Analysis operations
    AnalyzeSelected,
    AnalyzeAll,
    AnalysisResult(u64, AnalysisEntry),
    AnalysisFailed(String),

    // UI states
    SetError(Option<String>),
    SetDragging(bool),
    ToggleTheme,
    PreviewLoaded,

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

pub struct Model {
    pub page: Page,
    pub files: HashMap<u64, FileData>,
    pub selected_file_id: Option<u64>,
    pub results: HashMap<u64, AnalysisEntry>,
    pub model_info: Option<ModelInfo>,
    pub loading: bool,
    pub error: Option<String>,
    pub is_dragging: bool,
    pub paste_listener: Option<EventListener>,
    pub theme: String,
    pub pending_requests: usize,
    pub preview_loading: bool,
    pub preview_load_timeout: Option<Timeout>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            page: Page::Home,
            files: HashMap::new(),
            selected_file_id: None,
            results: HashMap::new(),
            model_info: None,
            loading: false,
            error: None,
            is_dragging: false,
            paste_listener: None,
            theme: handlers::stored_theme(),
            pending_requests: 0,
            preview_loading: false,
            preview_load_timeout: None,
        };
        handlers::apply_theme(&model.theme);

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        handlers::fetch_model_info(ctx);
        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(page) => handlers::handle_navigate(self, page),
            Msg::ModelInfoLoaded(info) => {
                self.model_info = Some(info);
                true
            }

            // File operations
            Msg::FilesAdded(files) => handlers::handle_files_added(self, ctx, files),
            Msg::AddPreview(id, url) => handlers::handle_add_preview(self, id, url),
            Msg::RemoveFile(id) => handlers::handle_remove_file(self, id),
            Msg::SelectFile(id) => handlers::handle_select_file(self, ctx, id),
            Msg::ClearAllFiles => handlers::handle_clear_all_files(self),

            // Analysis operations
            Msg::AnalyzeSelected => handlers::handle_analyze_selected(self, ctx),
            Msg::AnalyzeAll => handlers::handle_analyze_all(self, ctx),
            Msg::AnalysisResult(file_id, entry) => handlers::handle_analysis_result(self, file_id, entry),
            Msg::AnalysisFailed(error) => handlers::handle_analysis_failed(self, error),

            // UI states
            Msg::SetError(error) => {
                self.error = error;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::ToggleTheme => handlers::handle_toggle_theme(self),
            Msg::PreviewLoaded => handlers::handle_preview_loaded(self),

            // Input events
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }
                <div class="top-right">
                    { render_theme_toggle(&self.theme, ctx.link()) }
                </div>
                { render_navigation(self.page, ctx.link()) }

                <main class="main-content">
                {
                    match self.page {
                        Page::Home => render_home(),
                        Page::Detection => html! {
                            <>
                                { render_upload_section(self, ctx) }
                                { render_preview_area(self, ctx) }
                                { render_error_message(self) }
                                { render_results(self) }
                            </>
                        },
                        Page::About => render_about(self.model_info.as_ref()),
                    }
                }
                </main>

                <footer class="app-footer">
                    <p>{"MRI Tumor Detection System | For educational and research purposes only"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
