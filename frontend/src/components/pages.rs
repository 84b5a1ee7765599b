use shared::{ModelInfo, TumorClass};
use yew::prelude::*;

const STATS: [(&str, &str); 4] = [
    ("99.2%", "Accuracy Rate"),
    ("4", "Tumor Types"),
    ("< 5s", "Analysis Time"),
    ("24/7", "Availability"),
];

const FEATURES: [(&str, &str, &str); 4] = [
    (
        "fa-solid fa-microchip",
        "Advanced AI Technology",
        "Deep learning trained on labelled brain MRI scans for accurate tumor detection.",
    ),
    (
        "fa-solid fa-magnifying-glass",
        "Precise Classification",
        "Identifies glioma, meningioma and pituitary tumors, and confirms healthy brain tissue.",
    ),
    (
        "fa-solid fa-chart-column",
        "Confidence Scoring",
        "Shows a confidence percentage for every class so each prediction can be weighed.",
    ),
    (
        "fa-solid fa-notes-medical",
        "Treatment Guidance",
        "Every prediction comes with a reference treatment plan for the detected class.",
    ),
];

const STEPS: [(&str, &str); 4] = [
    ("Upload MRI", "Select JPG or PNG brain MRI scans from your device."),
    ("AI Analysis", "The CNN scores every scan in seconds."),
    ("Instant Results", "Inspect the predicted class and its confidence."),
    ("Treatment Plan", "Receive treatment recommendations for the detected condition."),
];

pub fn render_home() -> Html {
    html! {
        <div class="home-page">
            <section class="hero">
                <h2>{"Brain Tumor Detection from MRI"}</h2>
                <p>{"Upload a brain MRI scan to classify it as glioma, meningioma, pituitary tumor or no tumor."}</p>
            </section>

            <section class="stats">
                { for STATS.iter().map(|(value, label)| html! {
                    <div class="stat-card">
                        <span class="stat-value">{ *value }</span>
                        <span class="stat-label">{ *label }</span>
                    </div>
                })}
            </section>

            <section class="features">
                { for FEATURES.iter().map(|(icon, title, text)| html! {
                    <div class="feature-card">
                        <i class={*icon}></i>
                        <h3>{ *title }</h3>
                        <p>{ *text }</p>
                    </div>
                })}
            </section>

            <section class="how-it-works">
                <h2>{"How It Works"}</h2>
                <ol>
                    { for STEPS.iter().map(|(title, text)| html! {
                        <li><strong>{ *title }</strong>{ format!(": {}", text) }</li>
                    })}
                </ol>
            </section>

            { render_disclaimer() }
        </div>
    }
}

pub fn render_about(model_info: Option<&ModelInfo>) -> Html {
    html! {
        <div class="about-page">
            <section>
                <h2>{"About the Model"}</h2>
                <p>
                    {"The classifier is a convolutional neural network trained on labelled brain MRI scans. \
                      It outputs one probability per class and the highest one is reported as the prediction."}
                </p>
                { render_model_details(model_info) }
            </section>

            <section>
                <h2>{"Detected Classes"}</h2>
                <ul class="class-list">
                    { for TumorClass::ALL.iter().map(|class| html! {
                        <li class={class.as_ref().to_string()}>
                            <strong>{ class.display_name() }</strong>
                            { if class.is_tumor() { " (tumor)" } else { " (healthy)" } }
                        </li>
                    })}
                </ul>
            </section>

            { render_disclaimer() }
        </div>
    }
}

fn render_model_details(model_info: Option<&ModelInfo>) -> Html {
    match model_info {
        Some(info) => html! {
            <table class="model-details">
                <tr><th>{"Engine"}</th><td>{ &info.engine }</td></tr>
                <tr><th>{"Input"}</th><td>{ format!("{} x {} x {}", info.input_size, info.input_size, info.channels) }</td></tr>
                <tr><th>{"Classes"}</th><td>{ info.class_labels.join(", ") }</td></tr>
            </table>
        },
        None => html! { <p class="model-details-unavailable">{"Model details unavailable."}</p> },
    }
}

fn render_disclaimer() -> Html {
    html! {
        <section class="disclaimer">
            <h3><i class="fa-solid fa-triangle-exclamation"></i>{" Medical Disclaimer"}</h3>
            <p>
                {"This tool is for educational and research purposes only. It is not a substitute for \
                  professional medical advice, diagnosis or treatment."}
            </p>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_page_lists_four_of_each_card() {
        assert_eq!(STATS.len(), 4);
        assert_eq!(FEATURES.len(), 4);
        assert!(FEATURES.iter().any(|(_, title, _)| *title == "Precise Classification"));
        assert_eq!(STEPS.len(), 4);
        assert_eq!(STEPS[3].0, "Treatment Plan");
        assert!(STEPS[3].1.starts_with("Receive treatment recommendations"));
    }
}
