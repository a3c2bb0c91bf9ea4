/// Wire types for the personalization service
///
/// These structs mirror the service's JSON responses. The service sends more
/// fields than we use (filenames, template names, prompt echoes); serde
/// ignores the extras, and the identifiers are opaque strings we never parse.

use serde::{Deserialize, Serialize};

/// Response to a successful photo upload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedPhoto {
    /// Opaque identifier for the stored photo
    pub id: String,
    /// Whether the service detected a face in the photo (informational only)
    pub has_face: bool,
}

/// A generated illustration, as stored by the service
///
/// The gallery endpoint returns a list of these, newest first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonalizedImage {
    /// Opaque identifier for the illustration
    pub id: String,
    /// The photo this illustration was generated from
    #[serde(default)]
    pub original_photo_id: String,
    /// PNG payload, base64-encoded
    pub personalized_image: String,
    /// ISO-8601 creation timestamp (carried as-is, parsed only for display)
    pub created_at: String,
}

/// Request body for the generate endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub photo_id: String,
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_ignores_extra_fields() {
        let json = r#"{
            "id": "p1",
            "uploaded_at": "2025-10-07T12:00:00+00:00",
            "has_face": true,
            "message": "Photo uploaded successfully"
        }"#;

        let photo: UploadedPhoto = serde_json::from_str(json).unwrap();
        assert_eq!(photo.id, "p1");
        assert!(photo.has_face);
    }

    #[test]
    fn test_personalized_image_full_record() {
        let json = r#"{
            "id": "g1",
            "original_photo_id": "p1",
            "personalized_image": "aGVsbG8=",
            "template_used": "gemini-nano-banana",
            "created_at": "2025-10-07T12:34:56+00:00",
            "prompt_used": "some prompt"
        }"#;

        let image: PersonalizedImage = serde_json::from_str(json).unwrap();
        assert_eq!(image.id, "g1");
        assert_eq!(image.original_photo_id, "p1");
        assert_eq!(image.personalized_image, "aGVsbG8=");
        assert_eq!(image.created_at, "2025-10-07T12:34:56+00:00");
    }

    #[test]
    fn test_personalized_image_missing_origin_defaults_empty() {
        let json = r#"{
            "id": "g2",
            "personalized_image": "aGVsbG8=",
            "created_at": "2025-10-07T12:34:56+00:00"
        }"#;

        let image: PersonalizedImage = serde_json::from_str(json).unwrap();
        assert_eq!(image.original_photo_id, "");
    }

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateRequest {
            photo_id: "p1".to_string(),
            prompt: "make it whimsical".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["photo_id"], "p1");
        assert_eq!(json["prompt"], "make it whimsical");
    }
}
