use super::super::{MAX_FILES, Model, Msg};
use super::utils::{debounce, extract_image_files};
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let limit_reached = model.files.len() >= MAX_FILES;
    html! {
        <div class="upload-section">
            <h2><i class="fa-solid fa-microscope"></i>{" Brain MRI Analysis"}</h2>
            <p class="upload-hint">
                { format!("Upload up to {} brain MRI scans for tumor classification.", MAX_FILES) }
            </p>
            { render_file_input_area(model, ctx, limit_reached) }
        </div>
    }
}

fn open_file_picker() {
    let input = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("file-input"))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
    if let Some(input) = input {
        input.click();
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>, limit_reached: bool) -> Html {
    if limit_reached {
        return html! {
            <p class="limit-reached">
                { format!("You have reached the maximum of {} images.", MAX_FILES) }
            </p>
        };
    }

    let link = ctx.link();
    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files();
        let files_to_process = files.as_ref().map(extract_image_files).unwrap_or_default();

        input.set_value("");

        if !files_to_process.is_empty() {
            Msg::FilesAdded(files_to_process)
        } else {
            Msg::SetError(Some("No valid MRI images selected. Use JPG or PNG files.".into()))
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);

    html! {
        <>
            <input
                type="file"
                id="file-input"
                multiple=true
                accept="image/jpeg,image/png"
                style="display: none;"
                onchange={handle_change}
            />

            <button id="upload-button" class="analyze-btn" onclick={debounce(300, open_file_picker)}>
                <i class="fa-solid fa-upload"></i> {" Select MRI Scans"}
            </button>

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, open_file_picker)}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop MRI scans here, paste, or click"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG"}</p>
                </div>
            </div>
        </>
    }
}
