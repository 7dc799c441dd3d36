use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-microscope"></i> {" Skin Lesion Classifier"}</h1>
            <p class="subtitle">{"Upload a photo via button, drag & drop, or paste"}</p>
        </header>
    }
}
