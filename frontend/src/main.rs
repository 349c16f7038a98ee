mod api;
mod components;
mod config;

use std::collections::HashMap;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::curation::{CurationSession, LabelOutcome};
use shared::poll::PollReport;
use shared::render::StatusPanel;
use shared::workflow::{SubmissionReport, UploadController};
use shared::{CurationItem, Label, MediaType, ModelStatus};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

use crate::api::HttpApi;
use crate::components::{curation_panel, handlers, header, results, status_panel, upload_section, utils};

// Models
struct SelectedFile {
    file: GlooFile,
    preview_url: ObjectUrl,
}

// Yew msg components
enum Msg {
    // Upload workflow
    FileSelected(MediaType, GlooFile),
    ClearSelection(MediaType),
    Submit(MediaType),
    Submitted(SubmissionReport),
    PollFinished(PollReport),

    // Status panel
    StatusLoaded(shared::Result<ModelStatus>),

    // Curation
    FetchSample,
    SampleLoaded(shared::Result<CurationItem>),
    Decide(Label),
    LabelFinished(LabelOutcome),

    // UI states
    SetError(Option<String>),
    SetDragging(Option<MediaType>),

    // Input events
    HandleDrop(MediaType, DragEvent),
    HandlePaste(ClipboardEvent),
}

// Main component
struct Model {
    api: Rc<HttpApi>,
    upload: UploadController,
    selected: HashMap<MediaType, SelectedFile>,
    status: StatusPanel,
    curation: CurationSession,
    error: Option<String>,
    dragging: Option<MediaType>,
    paste_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = config::load_config();
        let mut model = Self {
            api: Rc::new(api::build_api(config)),
            upload: UploadController::new(),
            selected: HashMap::new(),
            status: StatusPanel::Loading,
            curation: CurationSession::new(),
            error: None,
            dragging: None,
            paste_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        } else {
            log::warn!("No window, paste-to-upload disabled");
        }

        handlers::load_model_status(&model, ctx);
        ctx.link().send_message(Msg::FetchSample);

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Upload workflow
            Msg::FileSelected(media_type, file) => {
                handlers::handle_file_selected(self, media_type, file)
            }
            Msg::ClearSelection(media_type) => self.selected.remove(&media_type).is_some(),
            Msg::Submit(media_type) => handlers::handle_submit(self, ctx, media_type),
            Msg::Submitted(report) => handlers::handle_submitted(self, ctx, report),
            Msg::PollFinished(report) => {
                self.upload.finish_poll(report);
                true
            }

            // Status panel
            Msg::StatusLoaded(status) => {
                self.status = shared::render::render_model_status(&status);
                true
            }

            // Curation
            Msg::FetchSample => handlers::handle_fetch_sample(self, ctx),
            Msg::SampleLoaded(sample) => {
                self.curation.sample_loaded(sample);
                true
            }
            Msg::Decide(label) => handlers::handle_decide(self, ctx, label),
            Msg::LabelFinished(outcome) => handlers::handle_label_finished(self, outcome),

            // UI states
            Msg::SetError(error) => {
                self.error = error;
                true
            }
            Msg::SetDragging(target) => {
                self.dragging = target;
                true
            }

            // Input events
            Msg::HandleDrop(media_type, event) => {
                handlers::handle_drop(self, ctx, media_type, event)
            }
            Msg::HandlePaste(event) => handlers::handle_paste(ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { header::render_header() }
                { status_panel::render_status_panel(&self.status) }

                <main class="main-content">
                    { upload_section::render_upload_section(self, ctx) }
                    { utils::render_error_message(self) }
                    { results::render_results(self.upload.view()) }
                    { curation_panel::render_curation_panel(&self.curation, ctx.link()) }
                </main>

                <footer class="app-footer">
                    <p>{"Deepfake Detector | Rust WASM client"}</p>
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
