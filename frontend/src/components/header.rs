use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-brain"></i> {" MRI Tumor Detection System"}</h1>
            <p class="subtitle">{"AI-powered brain MRI analysis for tumor detection"}</p>
        </header>
    }
}
