//! Pure mappings from service payloads to view models.

use crate::error::{ClientError, Result};
use crate::models::{CurationItem, ModelStatus, PredictionResponse, Verdict};

pub fn data_url(b64: &str) -> String {
    format!("data:image/png;base64,{}", b64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub caption: &'static str,
    pub src: String,
}

/// Before/after pair for one suspicious video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCard {
    /// 1-based position in the server's list.
    pub index: usize,
    pub original_src: String,
    pub overlaid_src: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gallery {
    Images(Vec<GalleryImage>),
    Frames(Vec<FrameCard>),
}

impl Gallery {
    pub fn image_count(&self) -> usize {
        match self {
            Gallery::Images(images) => images.len(),
            Gallery::Frames(cards) => cards.len() * 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub verdict: Verdict,
    pub confidence: String,
    pub gallery: Option<Gallery>,
}

impl ResultView {
    pub fn label(&self) -> &'static str {
        self.verdict.label()
    }

    /// CSS class for the verdict line.
    pub fn css_class(&self) -> &'static str {
        match self.verdict {
            Verdict::Real => "real",
            Verdict::Fake => "fake",
        }
    }

    pub fn verdict_text(&self) -> String {
        format!("Verdict: {}", self.label())
    }

    pub fn confidence_text(&self) -> String {
        format!("Confidence: {}", self.confidence)
    }
}

pub fn render_prediction(payload: &PredictionResponse) -> ResultView {
    let gallery = if !payload.suspicious_frames.is_empty() {
        Some(Gallery::Frames(
            payload
                .suspicious_frames
                .iter()
                .enumerate()
                .map(|(i, frame)| FrameCard {
                    index: i + 1,
                    original_src: data_url(&frame.original_b64),
                    overlaid_src: data_url(&frame.overlaid_b64),
                })
                .collect(),
        ))
    } else {
        let images: Vec<GalleryImage> = [
            ("Detected face", &payload.original_face_b64),
            ("Heatmap", &payload.heatmap_b64),
            ("Overlay", &payload.overlaid_b64),
        ]
        .into_iter()
        .filter_map(|(caption, b64)| {
            b64.as_deref().map(|b64| GalleryImage {
                caption,
                src: data_url(b64),
            })
        })
        .collect();
        (!images.is_empty()).then_some(Gallery::Images(images))
    };

    ResultView {
        verdict: payload.verdict,
        confidence: payload.confidence.clone(),
        gallery,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusPanel {
    Loading,
    Ready {
        model_name: String,
        trainable_parameters: String,
    },
    Unavailable(String),
}

pub fn render_model_status(status: &Result<ModelStatus>) -> StatusPanel {
    match status {
        Ok(status) => StatusPanel::Ready {
            model_name: status.model_name.clone(),
            trainable_parameters: group_thousands(status.trainable_parameters),
        },
        Err(err @ ClientError::Connection(_)) => StatusPanel::Unavailable(err.user_message()),
        Err(err) => StatusPanel::Unavailable(format!("Could not load model status: {}", err)),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurationCard {
    pub path: String,
    pub src: String,
}

pub fn render_curation_item(item: &CurationItem) -> CurationCard {
    CurationCard {
        path: item.path.clone(),
        src: data_url(&item.image_b64),
    }
}
