use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-user-secret"></i> {" Deepfake Detector"}</h1>
            <p class="subtitle">{"Upload a face image or a video to check whether it is real"}</p>
        </header>
    }
}
