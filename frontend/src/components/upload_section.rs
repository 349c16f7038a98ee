use super::super::Model;
use super::super::Msg;
use gloo_file::File as GlooFile;
use shared::{IntoEnumIterator, MediaType};
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { for MediaType::iter().map(|media_type| render_upload_form(model, ctx, media_type)) }
        </div>
    }
}

fn render_upload_form(model: &Model, ctx: &Context<Model>, media_type: MediaType) -> Html {
    let link = ctx.link();
    let input_id = format!("file-input-{}", media_type.as_ref());

    let handle_change = link.callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        match input.files().and_then(|files| files.item(0)) {
            Some(file) => Msg::FileSelected(media_type, GlooFile::from(file)),
            None => Msg::ClearSelection(media_type),
        }
    });

    let handle_submit = link.callback(move |e: SubmitEvent| {
        e.prevent_default();
        Msg::Submit(media_type)
    });

    let handle_drag_over = link.callback(move |e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(Some(media_type))
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(None)
    });

    let handle_drop = link.callback(move |e: DragEvent| Msg::HandleDrop(media_type, e));

    let selected = model.selected.get(&media_type);
    let (title, hint) = match media_type {
        MediaType::Image => ("Analyze an image", "Drop, paste, or choose a face photo"),
        MediaType::Video => ("Analyze a video", "Drop or choose a video clip"),
    };

    html! {
        <form
            id={format!("upload-form-{}", media_type.as_ref())}
            class="upload-form"
            onsubmit={handle_submit}
        >
            <h2>{ title }</h2>
            <div
                class={classes!("upload-area", (model.dragging == Some(media_type)).then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
            >
                <label class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{ hint }</p>
                    <input
                        type="file"
                        id={input_id}
                        accept={media_type.accept()}
                        onchange={handle_change}
                    />
                </label>
            </div>
            {
                match selected {
                    Some(selected) => html! {
                        <div class="preview">
                            {
                                match media_type {
                                    MediaType::Image => html! {
                                        <img src={selected.preview_url.to_string()} alt={selected.file.name()} />
                                    },
                                    MediaType::Video => html! {
                                        <video src={selected.preview_url.to_string()} controls=true muted=true />
                                    },
                                }
                            }
                            <p class="file-name">{ selected.file.name() }</p>
                        </div>
                    },
                    None => html! {},
                }
            }
            <button
                type="submit"
                class="analyze-btn"
                disabled={!model.upload.controls_enabled()}
            >
                <i class="fa-solid fa-magnifying-glass"></i>
                { format!(" Analyze {}", media_type.noun()) }
            </button>
        </form>
    }
}
