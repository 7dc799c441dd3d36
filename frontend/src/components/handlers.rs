use super::super::{Model, Msg, SelectedImage};
use super::utils::first_image_file;
use crate::api::classify_image;
use gloo_file::File as GlooFile;
use shared::ClassificationResult;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

pub fn handle_file_selected(model: &mut Model, file: GlooFile) -> bool {
    if model.state.is_analyzing() {
        log::warn!("Ignoring {} while an analysis is in flight", file.name());
        return false;
    }

    log::info!("Selected {} ({} bytes, '{}')", file.name(), file.size(), file.raw_mime_type());
    model.notice = None;
    model.state.select(SelectedImage::new(file))
}

pub fn handle_clear(model: &mut Model) -> bool {
    let cleared = model.state.clear();
    if cleared {
        model.notice = None;
    }
    cleared
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(image) = model.state.begin_analysis() else {
        return false;
    };

    model.notice = None;
    send_analysis_request(ctx, image.file.clone());
    true
}

pub fn handle_analysis_finished(model: &mut Model, result: ClassificationResult) -> bool {
    if !model.state.finish(result) {
        log::warn!("Discarding analysis result that arrived after the state changed");
        return false;
    }
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(data_transfer) = event.data_transfer() {
        if let Some(file_list) = data_transfer.files() {
            process_file_list(ctx, file_list);
        }
    }

    true
}

pub fn handle_paste(_model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if let Some(data_transfer) = event.clipboard_data() {
        if let Some(file_list) = data_transfer.files() {
            if file_list.length() > 0 {
                event.prevent_default();
                process_file_list(ctx, file_list);
                return true;
            }
        }
    }
    false
}

// Dropped or pasted non-image files are skipped; only the first image is used.
fn process_file_list(ctx: &Context<Model>, file_list: FileList) {
    match first_image_file(&file_list) {
        Some(file) => ctx.link().send_message(Msg::FileSelected(file)),
        None => {
            log::warn!("Ignoring {} dropped file(s) with no image among them", file_list.length());
            ctx.link()
                .send_message(Msg::SetNotice(Some("Only image files can be dropped here.".into())));
        }
    }
}

fn send_analysis_request(ctx: &Context<Model>, file: GlooFile) {
    spawn_local({
        let link = ctx.link().clone();

        async move {
            let result = match classify_image(&file).await {
                Ok(result) => result,
                Err(e) => {
                    gloo_console::error!(format!("Analysis failed: {}", e));
                    ClassificationResult::analysis_error()
                }
            };
            link.send_message(Msg::AnalysisFinished(result));
        }
    });
}
