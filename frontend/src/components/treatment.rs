use shared::{TreatmentPlan, TumorClass, treatment_plan};
use yew::prelude::*;

pub fn render_treatment_plan(class: TumorClass) -> Html {
    let plan: &TreatmentPlan = treatment_plan(class);
    html! {
        <div class={classes!("treatment-plan", class.as_ref().to_string())}>
            <h3><i class="fa-solid fa-notes-medical"></i>{ format!(" {}", plan.title) }</h3>
            <p class="treatment-overview">{ plan.overview }</p>
            <ol class="treatment-steps">
                { for plan.steps.iter().map(|step| html! {
                    <li>
                        <strong>{ step.heading }</strong>
                        <ul>
                            { for step.actions.iter().map(|action| html! { <li>{ *action }</li> }) }
                        </ul>
                    </li>
                })}
            </ol>
            <div class="treatment-meta">
                <span><i class="fa-regular fa-clock"></i>{ format!(" Duration: {}", plan.duration) }</span>
                <span><i class="fa-solid fa-chart-line"></i>{ format!(" Outlook: {}", plan.success_rate) }</span>
            </div>
        </div>
    }
}
