use super::super::{FileData, MAX_FILES, Model, Msg};
use super::utils::{debounce, format_file_size, truncate_name};
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    if model.files.is_empty() {
        return html! {};
    }

    let link = ctx.link().clone();
    let mut sorted_files: Vec<&FileData> = model.files.values().collect();
    sorted_files.sort_by_key(|fd| fd.id);

    html! {
        <div id="preview-container">
            { render_selected_image_preview(model) }
            <h2>{ format!("Scans: {} / {}", model.files.len(), MAX_FILES) }</h2>
            <div id="image-previews">
                { for sorted_files.iter().map(|file_data| render_preview_item(ctx, model, file_data)) }
            </div>
            <div class="button-container">
                <button
                    id="clear-all-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    disabled={model.loading}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::ClearAllFiles)
                    })}
                >
                    <i class="fa-solid fa-trash"></i>{" Clear All"}
                </button>
                <button
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::AnalyzeSelected)
                    })}
                    disabled={model.loading || model.selected_file_id.is_none()}
                >
                    { render_analyze_button_content(model) }
                </button>
                <button
                    class="analyze-btn"
                    style="background-color: var(--primary-color);"
                    disabled={model.loading}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::AnalyzeAll)
                    })}
                >
                    <i class="fa-solid fa-magnifying-glass"></i>{" Analyze All"}
                </button>
            </div>
        </div>
    }
}

fn render_preview_item(ctx: &Context<Model>, model: &Model, file_data: &FileData) -> Html {
    let file_id = file_data.id;
    let link = ctx.link();
    let is_selected = model.selected_file_id == Some(file_id);
    let status = model.results.get(&file_id).map(|entry| {
        match entry.inference.as_ref() {
            Some(inference) if inference.predicted.is_tumor() => "tumor",
            Some(_) => "clear",
            None => "failed",
        }
    });

    html! {
        <div
            class={classes!("preview-item", is_selected.then_some("selected"), status)}
            key={file_id.to_string()}
            onclick={link.callback(move |_| Msg::SelectFile(file_id))}
            title={format!(
                "{} ({})",
                file_data.file.name(),
                format_file_size(file_data.file.size())
            )}
        >
            {
                if let Some(url) = &file_data.preview_url {
                    html! { <img src={url.to_string()} alt={file_data.file.name()} /> }
                } else {
                    html! { <div class="preview-placeholder preview-placeholder-centered">{"..."}</div> }
                }
            }
            <button
                class="remove-btn"
                title="Remove this scan"
                onclick={link.callback(move |e: MouseEvent| {
                    e.stop_propagation();
                    Msg::RemoveFile(file_id)
                })}
            >
                <i class="fa-solid fa-times" style="font-size: 10px;"></i>
            </button>
        </div>
    }
}

fn render_selected_image_preview(model: &Model) -> Html {
    match model.selected_file_id {
        Some(_) if model.preview_loading => html! {
            <div class="loading-preview">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                <p style="margin-left: 10px;">{"Loading preview..."}</p>
            </div>
        },
        Some(id) => match model.files.get(&id).and_then(|fd| fd.preview_url.as_ref()) {
            Some(url) => html! {
                <img id="actual-image-preview" src={url.to_string()} alt="MRI scan preview" />
            },
            None => html! {
                <div class="unavailable-preview">
                    <p>{"Preview unavailable"}</p>
                </div>
            },
        },
        None => html! {
            <div class="select-preview">
                <p>{"Select a scan below"}</p>
            </div>
        },
    }
}

fn render_analyze_button_content(model: &Model) -> Html {
    if model.loading {
        return html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> };
    }
    let filename = model
        .selected_file_id
        .and_then(|id| model.files.get(&id))
        .map(|fd| fd.file.name())
        .unwrap_or_else(|| "Selected Scan".to_string());

    html! {
        <>
            <i class="fa-solid fa-magnifying-glass"></i>
            { format!(" Analyze \"{}\"", truncate_name(&filename, 20)) }
        </>
    }
}
