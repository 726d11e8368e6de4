use serde::Deserialize;

/// Subset of the extractor's info dict we care about. Unknown fields
/// are ignored; every field is optional because site extractors differ
/// in what they populate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub ext: Option<String>,
    pub duration: Option<f64>,
}

impl MediaInfo {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }
}
