use super::super::Msg;
use super::super::{Model, SelectedFile};
use crate::api::GlooTimer;
use crate::components::utils::{first_matching_file, matches_media_type};
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::curation::{LabelOutcome, label_and_fetch_next};
use shared::poll::{PollSettings, poll_until_terminal};
use shared::workflow::{PollRequest, SubmissionReport, submit};
use shared::{DetectionApi, Label, MediaType};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

pub fn handle_file_selected(model: &mut Model, media_type: MediaType, file: GlooFile) -> bool {
    if !matches_media_type(&file.raw_mime_type(), media_type) {
        log::warn!("Skipping {} for the {} form", file.name(), media_type.noun());
        model.error = Some(format!(
            "{} is not a {} file.",
            file.name(),
            media_type.noun()
        ));
        return true;
    }

    model.error = None;
    let preview_url = ObjectUrl::from(file.clone());
    // Replacing the entry drops the previous object URL.
    model.selected.insert(media_type, SelectedFile { file, preview_url });
    true
}

pub fn handle_submit(model: &mut Model, ctx: &Context<Model>, media_type: MediaType) -> bool {
    let file = model.selected.get(&media_type).map(|s| s.file.clone());
    let Some(task) = model.upload.begin(media_type, file) else {
        return true;
    };
    model.error = None;

    let api = model.api.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let report = submit(&*api, &task).await;
        link.send_message(Msg::Submitted(report));
    });
    true
}

pub fn handle_submitted(model: &mut Model, ctx: &Context<Model>, report: SubmissionReport) -> bool {
    if let Some(request) = model.upload.finish_submission(report) {
        start_polling(model, ctx, request);
    }
    true
}

fn start_polling(model: &Model, ctx: &Context<Model>, request: PollRequest) {
    let api = model.api.clone();
    let settings = PollSettings::from(model.api.config());
    let link = ctx.link().clone();
    spawn_local(async move {
        let report =
            poll_until_terminal(&*api, &GlooTimer, &request.job_id, settings, &request.handle).await;
        link.send_message(Msg::PollFinished(report));
    });
}

pub fn load_model_status(model: &Model, ctx: &Context<Model>) {
    let api = model.api.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let status = api.fetch_model_status().await;
        if let Err(e) = &status {
            log::warn!("Model status unavailable: {}", e);
        }
        link.send_message(Msg::StatusLoaded(status));
    });
}

pub fn handle_fetch_sample(model: &mut Model, ctx: &Context<Model>) -> bool {
    if !model.curation.start_fetch() {
        return false;
    }

    let api = model.api.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let sample = api.fetch_unlabeled_sample().await;
        link.send_message(Msg::SampleLoaded(sample));
    });
    true
}

pub fn handle_decide(model: &mut Model, ctx: &Context<Model>, label: Label) -> bool {
    let Some(request) = model.curation.decide(label) else {
        return false;
    };

    let api = model.api.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = label_and_fetch_next(&*api, &request).await;
        link.send_message(Msg::LabelFinished(outcome));
    });
    true
}

pub fn handle_label_finished(model: &mut Model, outcome: LabelOutcome) -> bool {
    model.curation.label_finished(outcome);
    if let Some(alert) = model.curation.take_alert() {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&alert);
        }
    }
    true
}

pub fn handle_drop(
    model: &mut Model,
    ctx: &Context<Model>,
    media_type: MediaType,
    event: DragEvent,
) -> bool {
    event.prevent_default();
    model.dragging = None;

    let file_list = event.data_transfer().and_then(|dt| dt.files());
    match file_list.and_then(|files| first_matching_file(&files, media_type)) {
        Some(file) => ctx.link().send_message(Msg::FileSelected(media_type, file)),
        None => ctx.link().send_message(Msg::SetError(Some(format!(
            "Drop a {} file here.",
            media_type.noun()
        )))),
    }
    true
}

pub fn handle_paste(ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if let Some(data_transfer) = event.clipboard_data() {
        if let Some(file_list) = data_transfer.files() {
            if let Some(file) = first_matching_file(&file_list, MediaType::Image) {
                event.prevent_default();
                ctx.link().send_message(Msg::FileSelected(MediaType::Image, file));
                return true;
            }
        }
    }
    false
}
