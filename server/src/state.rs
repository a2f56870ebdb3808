use std::path::PathBuf;

/// State shared by the media handlers
#[derive(Debug, Clone)]
pub struct MediaState {
    pub media_root: PathBuf,
}

impl MediaState {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }
}
