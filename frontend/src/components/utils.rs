use super::super::Model;
use gloo_file::File as GlooFile;
use shared::MediaType;
use web_sys::FileList;
use yew::prelude::*;

pub fn matches_media_type(mime: &str, media_type: MediaType) -> bool {
    mime.starts_with(&format!("{}/", media_type.as_ref()))
}

pub fn first_matching_file(file_list: &FileList, media_type: MediaType) -> Option<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .find(|file| matches_media_type(&file.type_(), media_type))
        .map(GlooFile::from)
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = &model.error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}
