/// Personalization service API module
///
/// This module handles:
/// - Uploading photos as multipart form data (client.rs)
/// - Requesting illustration generation (client.rs)
/// - Fetching the gallery of past creations (client.rs)
/// - The JSON wire types shared by those calls (types.rs)

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{PersonalizedImage, UploadedPhoto};

/// The fixed stylistic directive sent with every generation request.
/// Not user input; promotable to configuration without touching the workflow.
pub const TRANSFORM_PROMPT: &str = "Transform this child into a whimsical illustrated character \
with big expressive eyes, soft features, wearing a floral dress with a pink flower headband, \
in a cute cartoon style with pastel colors and a warm, playful atmosphere";
