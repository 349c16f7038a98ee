use super::super::Model;
use super::super::Msg;
use shared::curation::{CurationSession, CurationState};
use shared::{IntoEnumIterator, Label};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_curation_panel(session: &CurationSession, link: &Scope<Model>) -> Html {
    let body = match session.state() {
        CurationState::Idle | CurationState::Loading => html! {
            <p class="curation-loading">
                <i class="fa-solid fa-spinner fa-spin"></i>{" Loading next image..."}
            </p>
        },
        CurationState::Ready(_) | CurationState::Labeling(_) => render_sample(session, link),
        CurationState::Exhausted(message) => html! {
            <div class="curation-exhausted notice-warning">
                <p>{ message }</p>
                <p>{ format!("Images labeled this session: {}", session.labeled_count()) }</p>
            </div>
        },
        CurationState::Unavailable(message) => html! {
            <div class="curation-error">
                <p class="fake">{ message }</p>
                <button class="retry-btn" onclick={link.callback(|_| Msg::FetchSample)}>
                    <i class="fa-solid fa-rotate-right"></i>{" Retry"}
                </button>
            </div>
        },
    };

    html! {
        <section id="curation" class="curation-panel">
            <h2>{"Dataset curation"}</h2>
            { body }
        </section>
    }
}

fn render_sample(session: &CurationSession, link: &Scope<Model>) -> Html {
    let Some(card) = session.card() else {
        return html! {};
    };
    let disabled = !session.controls_enabled();

    html! {
        <div class="curation-sample">
            <img id="curation-image" src={card.src.clone()} alt={card.path.clone()} />
            <p class="curation-path">{ card.path.clone() }</p>
            <div class="curation-controls">
                { for Label::iter().map(|label| {
                    let class = match label {
                        Label::Real => "label-btn real",
                        Label::Fake => "label-btn fake",
                    };
                    html! {
                        <button
                            class={class}
                            disabled={disabled}
                            onclick={link.callback(move |_| Msg::Decide(label))}
                        >
                            { label.title() }
                        </button>
                    }
                })}
            </div>
        </div>
    }
}
