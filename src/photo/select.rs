/// Photo selection and validation
///
/// Both selection sources (the native file picker and files dropped onto the
/// window) produce a plain path, which is validated here before anything is
/// sent over the network. The gate is the file's declared media type: it must
/// be `image/*`, judged from the path the same way a browser judges a file's
/// MIME type, without reading the bytes.

use std::path::{Path, PathBuf};

use iced::widget::image;

/// A locally selected photo, ready to upload
///
/// Holds a previewable handle bound to the file. The handle is the only
/// reference to the preview resource; dropping the `LocalPhoto` (on reset or
/// when a new selection replaces it) releases it.
#[derive(Debug, Clone)]
pub struct LocalPhoto {
    /// Full path to the selected file
    pub path: PathBuf,
    /// Filename only (e.g. "cat.png"), used for the upload form and status line
    pub file_name: String,
    /// Renderable preview of the original photo
    pub preview: image::Handle,
}

impl LocalPhoto {
    /// Validate a selected path and allocate its preview handle
    ///
    /// Returns `None` when the file's declared type is not an image.
    pub fn open(path: PathBuf) -> Option<LocalPhoto> {
        if !is_image(&path) {
            return None;
        }

        let file_name = path.file_name()?.to_string_lossy().to_string();
        let preview = image::Handle::from_path(&path);

        Some(LocalPhoto {
            path,
            file_name,
            preview,
        })
    }
}

/// Check whether a path's declared media type is `image/*`
pub fn is_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false)
}
