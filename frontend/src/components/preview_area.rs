use super::super::{Model, Msg};
use super::utils::debounce;
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(image) = model.state.image() else {
        return html! {};
    };

    let link = ctx.link().clone();
    let busy = model.state.is_analyzing();
    let file_name = image.file.name();

    html! {
        <div id="preview-container">
            <img id="actual-image-preview"
                src={image.preview_url.to_string()}
                alt={file_name.clone()}
                title={file_name} />
            <div class="button-container">
                <button
                    id="clear-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    disabled={busy}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Clear)
                    })}
                >
                    <i class="fa-solid fa-trash"></i>{" Clear"}
                </button>
                <button
                    id="analyze-btn"
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Analyze)
                    })}
                    disabled={!model.state.can_analyze()}
                >
                    { render_analyze_button_content(model) }
                </button>
            </div>
        </div>
    }
}

fn render_analyze_button_content(model: &Model) -> Html {
    if model.state.is_analyzing() {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        let filename = model
            .state
            .image()
            .map(|image| image.file.name())
            .unwrap_or_else(|| "Selected Image".to_string());

        let display_name = if filename.chars().count() > 20 {
            format!("{}...", filename.chars().take(17).collect::<String>())
        } else {
            filename
        };

        html! { <><i class="fa-solid fa-magnifying-glass"></i>{ format!(" Analyze \"{}\"", display_name) }</> }
    }
}
