use shared::render::{FrameCard, Gallery, GalleryImage, ResultView};
use shared::workflow::{Notice, NoticeKind, UploadView};
use yew::prelude::*;

pub fn render_results(view: &UploadView) -> Html {
    if !view.loader_visible && view.notice.is_none() && view.result.is_none() {
        return html! {};
    }

    html! {
        <div id="result-container" class="results-container">
            if view.loader_visible {
                <div id="loader" class="loader"></div>
            }
            if let Some(notice) = &view.notice {
                { render_notice(notice) }
            }
            if let Some(result) = &view.result {
                { render_verdict(result) }
            }
        </div>
    }
}

fn render_notice(notice: &Notice) -> Html {
    let class = match notice.kind {
        NoticeKind::Info => "notice-info",
        NoticeKind::Warning => "notice-warning",
        NoticeKind::Error => "fake",
    };
    html! { <p id="result-text" class={classes!("notice", class)}>{ &notice.text }</p> }
}

fn render_verdict(result: &ResultView) -> Html {
    html! {
        <div class="verdict">
            <p id="result-text">
                <span class={result.css_class()}>{ result.verdict_text() }</span>
                <br />
                { result.confidence_text() }
            </p>
            {
                match &result.gallery {
                    Some(Gallery::Images(images)) => render_image_gallery(images),
                    Some(Gallery::Frames(cards)) => render_frame_gallery(cards),
                    None => html! {},
                }
            }
        </div>
    }
}

fn render_image_gallery(images: &[GalleryImage]) -> Html {
    html! {
        <div class="xai-gallery">
            <h3>{"Explainability"}</h3>
            <div class="gallery-grid">
                { for images.iter().map(|image| html! {
                    <figure class="gallery-item">
                        <img src={image.src.clone()} alt={image.caption} />
                        <figcaption>{ image.caption }</figcaption>
                    </figure>
                })}
            </div>
        </div>
    }
}

fn render_frame_gallery(cards: &[FrameCard]) -> Html {
    html! {
        <div class="xai-gallery">
            <h3>{ format!("Suspicious frames ({})", cards.len()) }</h3>
            { for cards.iter().map(|card| html! {
                <div class="frame-card">
                    <h4>{ format!("Frame {}", card.index) }</h4>
                    <div class="frame-pair">
                        <figure>
                            <img src={card.original_src.clone()} alt="Original frame" />
                            <figcaption>{"Original"}</figcaption>
                        </figure>
                        <figure>
                            <img src={card.overlaid_src.clone()} alt="Heatmap overlay" />
                            <figcaption>{"Heatmap overlay"}</figcaption>
                        </figure>
                    </div>
                </div>
            })}
        </div>
    }
}
