use shared::render::StatusPanel;
use yew::prelude::*;

pub fn render_status_panel(status: &StatusPanel) -> Html {
    let body = match status {
        StatusPanel::Loading => html! {
            <p><i class="fa-solid fa-spinner fa-spin"></i>{" Checking model status..."}</p>
        },
        StatusPanel::Ready {
            model_name,
            trainable_parameters,
        } => html! {
            <>
                <p><strong>{"Model:"}</strong>{ format!(" {}", model_name) }</p>
                <p><strong>{"Trainable parameters:"}</strong>{ format!(" {}", trainable_parameters) }</p>
            </>
        },
        StatusPanel::Unavailable(message) => html! {
            <p class="status-error">{ message }</p>
        },
    };

    html! {
        <section id="status-panel" class="status-panel">
            { body }
        </section>
    }
}
