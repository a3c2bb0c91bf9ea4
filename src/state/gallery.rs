/// Gallery of past creations
///
/// The gallery service is a read-only collaborator: we fetch the ordered
/// list it returns and render it, nothing more. Payloads are decoded into
/// render handles once, when the response lands, not on every frame.

use iced::widget::image;

use crate::api::types::PersonalizedImage;
use crate::photo::download::decode_payload;

/// One creation plus its decoded preview
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub image: PersonalizedImage,
    /// None when the payload failed to decode; the card shows a placeholder
    pub preview: Option<image::Handle>,
}

impl GalleryEntry {
    fn new(image: PersonalizedImage) -> Self {
        let preview = decode_payload(&image.personalized_image)
            .ok()
            .map(image::Handle::from_bytes);

        GalleryEntry { image, preview }
    }
}

/// Fetched gallery state, in the service's order (newest first)
#[derive(Debug, Default)]
pub struct Gallery {
    entries: Vec<GalleryEntry>,
    loading: bool,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark a fetch as started (the view shows the loading indicator)
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply a fetch result; on success returns how many entries arrived
    pub fn finish_load(
        &mut self,
        result: Result<Vec<PersonalizedImage>, String>,
    ) -> Result<usize, String> {
        self.loading = false;

        let images = result?;
        self.entries = images.into_iter().map(GalleryEntry::new).collect();

        Ok(self.entries.len())
    }
}
