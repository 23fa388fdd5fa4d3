use crate::upload::ProcessingResult;
use eframe::egui::ColorImage;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Empty,
    Previewing,
    Processing,
    ResultsShown,
}

impl UploadState {
    pub fn status_text(&self) -> &'static str {
        match self {
            UploadState::Empty => "Drop an image to begin",
            UploadState::Previewing => "Ready to process",
            UploadState::Processing => "Processing...",
            UploadState::ResultsShown => "Results ready",
        }
    }
}

#[derive(Clone, Default)]
pub enum PreviewStatus {
    #[default]
    None,
    Decoding,
    Ready(ColorImage),
    /// Decoding finished but the bytes could not be rendered.
    Unavailable(String),
}

impl fmt::Debug for PreviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewStatus::None => f.write_str("None"),
            PreviewStatus::Decoding => f.write_str("Decoding"),
            PreviewStatus::Ready(image) => write!(f, "Ready({}x{})", image.size[0], image.size[1]),
            PreviewStatus::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

impl PreviewStatus {
    /// Decoding has completed, whatever the outcome.
    pub fn is_settled(&self) -> bool {
        matches!(self, PreviewStatus::Ready(_) | PreviewStatus::Unavailable(_))
    }
}

/// A message the user has to acknowledge before continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Text for every result element, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub original_text: String,
    pub translated_text: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub info_type: String,
    /// `None` hides the additional information row.
    pub additional_info: Option<String>,
}

impl ResultView {
    pub fn render(result: &ProcessingResult) -> Self {
        let fields = &result.parsed_fields;
        Self {
            original_text: result.original_text.clone(),
            translated_text: result.translated_text.clone(),
            name: fields.name.clone(),
            phone: fields.phone.clone(),
            address: fields.address.clone(),
            info_type: fields.info_type.clone(),
            additional_info: fields
                .additional_info
                .clone()
                .filter(|info| !info.is_empty()),
        }
    }

    pub fn additional_info_visible(&self) -> bool {
        self.additional_info.is_some()
    }

    /// Label/value pairs in display order.
    pub fn field_rows(&self) -> [(&'static str, &str); 4] {
        [
            ("Name", self.name.as_str()),
            ("Phone", self.phone.as_str()),
            ("Address", self.address.as_str()),
            ("Type of Information", self.info_type.as_str()),
        ]
    }
}
