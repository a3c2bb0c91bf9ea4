/// Saving personalized illustrations to disk
///
/// The service delivers illustrations as base64-encoded PNG payloads; saving
/// one is a purely local operation: decode, pick a destination with the
/// native save dialog, write. The suggested filename is derived from the
/// illustration's id, so repeated downloads of the same creation collide
/// deliberately.

use std::path::PathBuf;

use base64::Engine;
use rfd::FileDialog;

use crate::api::types::PersonalizedImage;

/// Deterministic filename for a downloaded illustration
pub fn artifact_name(id: &str) -> String {
    format!("personalized-{}.png", id)
}

/// Decode a base64 image payload into raw bytes
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, String> {
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| format!("Invalid image payload: {}", e))
}

/// Save an illustration via the native save dialog
///
/// Returns `Ok(None)` when the user cancels the dialog - cancelling a
/// download is not an error.
pub fn save_personalized(image: &PersonalizedImage) -> Result<Option<PathBuf>, String> {
    let bytes = decode_payload(&image.personalized_image)?;

    let mut dialog = FileDialog::new()
        .set_title("Save Illustration")
        .set_file_name(artifact_name(&image.id));

    if let Some(downloads) = dirs::download_dir() {
        dialog = dialog.set_directory(downloads);
    }

    let target = match dialog.save_file() {
        Some(target) => target,
        None => return Ok(None),
    };

    std::fs::write(&target, bytes)
        .map_err(|e| format!("Failed to write {}: {}", target.display(), e))?;

    println!("💾 Saved illustration to {}", target.display());

    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name("g1"), "personalized-g1.png");
        assert_eq!(
            artifact_name("550e8400-e29b-41d4-a716-446655440000"),
            "personalized-550e8400-e29b-41d4-a716-446655440000.png"
        );
    }

    #[test]
    fn test_decode_payload_roundtrip() {
        // "hello" in base64
        let bytes = decode_payload("aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_payload_rejects_garbage() {
        let error = decode_payload("not base64!!!").unwrap_err();
        assert!(error.contains("Invalid image payload"));
    }
}
