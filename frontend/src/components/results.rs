use super::super::Model;
use super::treatment::render_treatment_plan;
use shared::{AnalysisEntry, InferenceResponse, TumorClass};
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let Some(selected_id) = model.selected_file_id else {
        return html! {};
    };
    let Some(entry) = model.results.get(&selected_id) else {
        return html! { <p class="no-results-message">{"No analysis result available for the selected scan."}</p> };
    };

    match &entry.inference {
        Some(inference) => render_inference(entry, inference),
        None => html! {
            <div class="results-container analysis-failed">
                <h2><i class="fa-solid fa-triangle-exclamation"></i>{ format!(" Could not analyze {}", entry.file_name) }</h2>
                <p>{ entry.error.as_deref().unwrap_or("Unknown error") }</p>
            </div>
        },
    }
}

fn render_inference(entry: &AnalysisEntry, inference: &InferenceResponse) -> Html {
    let predicted = inference.predicted;
    let is_tumor = predicted.is_tumor();

    html! {
        <div class={classes!("results-container", if is_tumor { "tumor-detected" } else { "no-tumor" })}>
            <div class="result-header">
                <h2 title={format!("Analysis results for: {}", entry.file_name)}>
                    {
                        if is_tumor {
                            html! { <><i class="fa-solid fa-triangle-exclamation"></i>{ format!(" Tumor Detected: {}", predicted.display_name()) }</> }
                        } else {
                            html! { <><i class="fa-solid fa-circle-check"></i>{" No Tumor Detected"}</> }
                        }
                    }
                    <span class="analyzed-filename-display">{ format!("({})", entry.file_name) }</span>
                </h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Confidence:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", inference.confidence)}></div>
                    </div>
                    <div class="meter-value">{ format!("{:.1}%", inference.confidence) }</div>
                </div>
                if entry.cached {
                    <p class="cached-note"><i class="fa-solid fa-bolt"></i>{" Served from cache"}</p>
                }
            </div>
            <div class="detailed-results">
                <h3>{"Class Probabilities"}</h3>
                <div class="result-bars">
                    { for TumorClass::ALL.iter().zip(inference.predictions.iter()).map(|(class, &p)| {
                        let percentage = p * 100.0;
                        html! {
                            <div class={classes!("result-item", (*class == predicted).then_some("predicted"))}>
                                <div class="result-label">{ class.display_name() }</div>
                                <div class="result-bar-container">
                                    <div class="result-bar" style={format!("width: {}%", percentage)}></div>
                                </div>
                                <div class="result-value">{ format!("{:.1}%", percentage) }</div>
                            </div>
                        }
                    })}
                </div>
            </div>
            { render_treatment_plan(predicted) }
            <p class="disclaimer">
                <i class="fa-solid fa-circle-info"></i>
                {" This result is generated by an AI model and is not a medical diagnosis. Consult a qualified clinician."}
            </p>
        </div>
    }
}
