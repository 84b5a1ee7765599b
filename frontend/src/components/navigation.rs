use super::super::{Model, Msg, Page};
use yew::html::Scope;
use yew::prelude::*;

const PAGES: [(Page, &str, &str); 3] = [
    (Page::Home, "Home", "fa-solid fa-house"),
    (Page::Detection, "Disease Detection", "fa-solid fa-microscope"),
    (Page::About, "About", "fa-solid fa-circle-info"),
];

pub fn render_navigation(current: Page, link: &Scope<Model>) -> Html {
    html! {
        <nav class="app-nav">
            { for PAGES.iter().map(|&(page, label, icon)| {
                html! {
                    <button
                        class={classes!("nav-pill", (page == current).then_some("active"))}
                        onclick={link.callback(move |_| Msg::Navigate(page))}
                    >
                        <i class={icon}></i>{ format!(" {}", label) }
                    </button>
                }
            })}
        </nav>
    }
}
