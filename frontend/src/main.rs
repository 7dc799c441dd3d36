mod api;
mod components;
mod state;

use components::handlers;
use components::header::render_header;
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::upload_section::render_upload_section;
use components::utils::render_notice;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::ClassificationResult;
use state::UploadState;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

// Models
pub struct SelectedImage {
    pub file: GlooFile,
    pub preview_url: ObjectUrl,
}

impl SelectedImage {
    pub fn new(file: GlooFile) -> Self {
        let preview_url = ObjectUrl::from(file.clone());
        Self { file, preview_url }
    }
}

// Yew msg components
pub enum Msg {
    // File operations
    FileSelected(GlooFile),
    Clear,

    // Analysis operations
    Analyze,
    AnalysisFinished(ClassificationResult),

    // UI states
    SetNotice(Option<String>),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

// Main component
pub struct Model {
    pub state: UploadState<SelectedImage>,
    pub notice: Option<String>,
    pub is_dragging: bool,
    _paste_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let paste_listener = web_sys::window().map(|window| {
            EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            })
        });
        if paste_listener.is_none() {
            log::error!("No global `window`; paste support disabled");
        }

        Self {
            state: UploadState::default(),
            notice: None,
            is_dragging: false,
            _paste_listener: paste_listener,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileSelected(file) => handlers::handle_file_selected(self, file),
            Msg::Clear => handlers::handle_clear(self),

            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::AnalysisFinished(result) => handlers::handle_analysis_finished(self, result),

            Msg::SetNotice(notice) => {
                self.notice = notice;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                { render_upload_section(self, ctx) }
                { render_preview_area(self, ctx) }
                { render_notice(self) }
                { render_results(self) }
                </main>

                <footer class="app-footer">
                    <p>{"Demo only: results are simulated and are not a medical diagnosis."}</p>
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
