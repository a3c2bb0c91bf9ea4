/// The transformation workflow state machine
///
/// One selected photo travels `Idle → Selected → Uploading → Uploaded →
/// Generating → Completed`. Errors during the two network stages land in a
/// non-terminal `Error` stage the user can retry out of, and `reset` returns
/// to `Idle` from anywhere. The machine owns the single live copy of each
/// artifact: the local photo (with its preview handle), the uploaded photo
/// record, and the generated illustration.
///
/// Network calls themselves live in `crate::api`; the controller asks this
/// machine for permission to start one (`begin_upload` / `begin_generate`)
/// and reports the result back (`finish_upload` / `finish_generate`). Each
/// `begin_*` hands out a `RequestToken` stamped with the current request
/// generation; `reset` and a new selection bump the generation, so responses
/// that arrive after either are recognized as stale and discarded instead of
/// being applied to a workflow they no longer belong to.

use std::path::PathBuf;

use iced::widget::image;
use thiserror::Error;

use crate::api::types::{PersonalizedImage, UploadedPhoto};
use crate::photo::download::decode_payload;
use crate::photo::LocalPhoto;

/// Everything that can go wrong in the workflow, in user-facing terms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    /// The selected file's declared media type is not an image
    #[error("Please select an image file")]
    InvalidFileType,
    /// Transform was invoked with no photo selected
    #[error("Please select a photo first")]
    NoPhotoSelected,
    /// Generation was requested before any successful upload
    #[error("Please upload a photo first")]
    NoUploadedPhoto,
    /// A network call is already in flight; the new invocation is dropped
    #[error("Another request is still in progress")]
    RequestPending,
    /// The upload service rejected the photo or could not be reached
    #[error("Upload failed: {0}")]
    UploadFailed(String),
    /// The generation service failed; any earlier result is kept
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Where the current photo is in its journey
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Nothing selected
    Idle,
    /// A validated photo is held, nothing sent yet
    Selected,
    /// Upload call in flight
    Uploading,
    /// Upload succeeded; the controller chains straight into generation
    Uploaded,
    /// Generation call in flight
    Generating,
    /// An illustration is held and displayed
    Completed,
    /// A network stage failed; retryable, never terminal
    Error(WorkflowError),
}

/// Staleness guard for in-flight calls
///
/// Captured when a call starts, checked when its response lands. Tokens from
/// before a reset or a new selection no longer match and their responses are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// What happened when an upload response was applied
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Upload stored; the controller should start generation now
    Uploaded { has_face: bool },
    /// Upload failed; the photo is kept so the user can retry
    Failed(WorkflowError),
    /// Response outlived its workflow; nothing was changed
    Stale,
}

/// What happened when a generation response was applied
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// A new illustration is held and displayed
    Completed,
    /// Generation failed; a previously completed illustration stays visible
    Failed(WorkflowError),
    /// Response outlived its workflow; nothing was changed
    Stale,
}

/// State for one photo's selection-to-illustration lifecycle
#[derive(Debug)]
pub struct Workflow {
    stage: Stage,
    photo: Option<LocalPhoto>,
    uploaded: Option<UploadedPhoto>,
    result: Option<PersonalizedImage>,
    /// Decoded render handle for `result`, kept in lockstep with it
    result_preview: Option<image::Handle>,
    /// Monotonic request generation; bumped by reset and new selections
    generation: u64,
}

impl Workflow {
    pub fn new() -> Self {
        Workflow {
            stage: Stage::Idle,
            photo: None,
            uploaded: None,
            result: None,
            result_preview: None,
            generation: 0,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn photo(&self) -> Option<&LocalPhoto> {
        self.photo.as_ref()
    }

    pub fn uploaded(&self) -> Option<&UploadedPhoto> {
        self.uploaded.as_ref()
    }

    pub fn result(&self) -> Option<&PersonalizedImage> {
        self.result.as_ref()
    }

    pub fn result_preview(&self) -> Option<&image::Handle> {
        self.result_preview.as_ref()
    }

    /// True while an upload or generation call is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self.stage, Stage::Uploading | Stage::Generating)
    }

    /// Select a photo, replacing the previous one
    ///
    /// An invalid file leaves the machine untouched. A valid one drops the
    /// old photo (releasing its preview handle), discards all downstream
    /// artifacts, and orphans any call still in flight.
    pub fn select(&mut self, path: PathBuf) -> Result<(), WorkflowError> {
        let photo = LocalPhoto::open(path).ok_or(WorkflowError::InvalidFileType)?;

        self.photo = Some(photo);
        self.uploaded = None;
        self.result = None;
        self.result_preview = None;
        self.generation += 1;
        self.stage = Stage::Selected;

        Ok(())
    }

    /// Start the upload stage
    ///
    /// Returns the token to report back with and the path to send. Refused
    /// while another call is in flight or when no photo is held.
    pub fn begin_upload(&mut self) -> Result<(RequestToken, PathBuf), WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::RequestPending);
        }

        let photo = self.photo.as_ref().ok_or(WorkflowError::NoPhotoSelected)?;
        let path = photo.path.clone();

        self.stage = Stage::Uploading;

        Ok((RequestToken(self.generation), path))
    }

    /// Apply an upload response
    ///
    /// Success stores the uploaded photo record and lands in `Uploaded`;
    /// failure lands in `Error` but keeps the photo (and any record from an
    /// earlier successful upload) so the user can retry. Stale responses are
    /// discarded without touching anything.
    pub fn finish_upload(
        &mut self,
        token: RequestToken,
        result: Result<UploadedPhoto, String>,
    ) -> UploadOutcome {
        if token.0 != self.generation || !matches!(self.stage, Stage::Uploading) {
            return UploadOutcome::Stale;
        }

        match result {
            Ok(photo) => {
                let has_face = photo.has_face;
                self.uploaded = Some(photo);
                self.stage = Stage::Uploaded;
                UploadOutcome::Uploaded { has_face }
            }
            Err(detail) => {
                let error = WorkflowError::UploadFailed(detail);
                self.stage = Stage::Error(error.clone());
                UploadOutcome::Failed(error)
            }
        }
    }

    /// Start the generation stage
    ///
    /// Valid right after an upload (the automatic chain) and again from
    /// `Completed` or a generation error (regenerate/retry) - the held photo
    /// id is reused, nothing is re-uploaded.
    pub fn begin_generate(&mut self) -> Result<(RequestToken, String), WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::RequestPending);
        }

        let uploaded = self.uploaded.as_ref().ok_or(WorkflowError::NoUploadedPhoto)?;
        let photo_id = uploaded.id.clone();

        self.stage = Stage::Generating;

        Ok((RequestToken(self.generation), photo_id))
    }

    /// Apply a generation response
    ///
    /// Success replaces the held illustration; failure keeps the previous
    /// one visible (failure of call N+1 leaves the result of call N intact).
    /// Stale responses are discarded without touching anything.
    pub fn finish_generate(
        &mut self,
        token: RequestToken,
        result: Result<PersonalizedImage, String>,
    ) -> GenerateOutcome {
        if token.0 != self.generation || !matches!(self.stage, Stage::Generating) {
            return GenerateOutcome::Stale;
        }

        match result {
            Ok(illustration) => {
                self.result_preview = decode_payload(&illustration.personalized_image)
                    .ok()
                    .map(image::Handle::from_bytes);
                self.result = Some(illustration);
                self.stage = Stage::Completed;
                GenerateOutcome::Completed
            }
            Err(detail) => {
                let error = WorkflowError::GenerationFailed(detail);
                self.stage = Stage::Error(error.clone());
                GenerateOutcome::Failed(error)
            }
        }
    }

    /// Return to `Idle`, dropping every held artifact
    ///
    /// Dropping the photo releases its preview handle; bumping the request
    /// generation orphans any call still in flight. Calling reset on an
    /// already-idle machine does nothing.
    pub fn reset(&mut self) {
        if matches!(self.stage, Stage::Idle) && self.photo.is_none() {
            return;
        }

        self.photo = None;
        self.uploaded = None;
        self.result = None;
        self.result_preview = None;
        self.generation += 1;
        self.stage = Stage::Idle;
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded_photo(id: &str, has_face: bool) -> UploadedPhoto {
        UploadedPhoto {
            id: id.to_string(),
            has_face,
        }
    }

    fn illustration(id: &str) -> PersonalizedImage {
        PersonalizedImage {
            id: id.to_string(),
            original_photo_id: "p1".to_string(),
            personalized_image: "aGVsbG8=".to_string(),
            created_at: "2025-10-07T12:00:00+00:00".to_string(),
        }
    }

    /// Drive a fresh workflow through select → upload → generate
    fn completed_workflow() -> Workflow {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();

        let (token, _path) = workflow.begin_upload().unwrap();
        workflow.finish_upload(token, Ok(uploaded_photo("p1", false)));

        let (token, photo_id) = workflow.begin_generate().unwrap();
        assert_eq!(photo_id, "p1");
        workflow.finish_generate(token, Ok(illustration("g1")));

        workflow
    }

    #[test]
    fn test_starts_idle_and_empty() {
        let workflow = Workflow::new();
        assert_eq!(*workflow.stage(), Stage::Idle);
        assert!(workflow.photo().is_none());
        assert!(workflow.uploaded().is_none());
        assert!(workflow.result().is_none());
        assert!(!workflow.is_busy());
    }

    #[test]
    fn test_select_valid_image() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();

        assert_eq!(*workflow.stage(), Stage::Selected);
        assert_eq!(workflow.photo().unwrap().file_name, "cat.png");
    }

    #[test]
    fn test_select_non_image_is_rejected_without_state_change() {
        let mut workflow = Workflow::new();
        let error = workflow.select(PathBuf::from("notes.txt")).unwrap_err();

        assert_eq!(error, WorkflowError::InvalidFileType);
        assert_eq!(*workflow.stage(), Stage::Idle);
        assert!(workflow.photo().is_none());
    }

    #[test]
    fn test_happy_path_reaches_completed() {
        let workflow = completed_workflow();

        assert_eq!(*workflow.stage(), Stage::Completed);
        assert_eq!(workflow.result().unwrap().id, "g1");
        assert!(workflow.result_preview().is_some());
    }

    #[test]
    fn test_upload_success_lands_in_uploaded_with_face_flag() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();

        let (token, path) = workflow.begin_upload().unwrap();
        assert_eq!(path, PathBuf::from("cat.png"));
        assert_eq!(*workflow.stage(), Stage::Uploading);

        let outcome = workflow.finish_upload(token, Ok(uploaded_photo("p1", true)));
        assert_eq!(outcome, UploadOutcome::Uploaded { has_face: true });
        assert_eq!(*workflow.stage(), Stage::Uploaded);
        assert_eq!(workflow.uploaded().unwrap().id, "p1");
    }

    #[test]
    fn test_transform_without_photo_surfaces_error() {
        let mut workflow = Workflow::new();
        assert_eq!(
            workflow.begin_upload().unwrap_err(),
            WorkflowError::NoPhotoSelected
        );
        assert_eq!(*workflow.stage(), Stage::Idle);
    }

    #[test]
    fn test_generate_without_upload_surfaces_error() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();
        assert_eq!(
            workflow.begin_generate().unwrap_err(),
            WorkflowError::NoUploadedPhoto
        );
        assert_eq!(*workflow.stage(), Stage::Selected);
    }

    #[test]
    fn test_second_transform_while_uploading_is_refused() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();
        let _pending = workflow.begin_upload().unwrap();

        assert_eq!(
            workflow.begin_upload().unwrap_err(),
            WorkflowError::RequestPending
        );
        assert_eq!(*workflow.stage(), Stage::Uploading);
    }

    #[test]
    fn test_regenerate_while_generating_is_refused() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();
        let (token, _) = workflow.begin_upload().unwrap();
        workflow.finish_upload(token, Ok(uploaded_photo("p1", false)));
        let _pending = workflow.begin_generate().unwrap();

        assert_eq!(
            workflow.begin_generate().unwrap_err(),
            WorkflowError::RequestPending
        );
    }

    #[test]
    fn test_upload_failure_is_retryable() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();

        let (token, _) = workflow.begin_upload().unwrap();
        let outcome = workflow.finish_upload(token, Err("server unavailable".to_string()));

        assert_eq!(
            outcome,
            UploadOutcome::Failed(WorkflowError::UploadFailed("server unavailable".to_string()))
        );
        assert!(matches!(workflow.stage(), Stage::Error(_)));
        // The photo is kept, so the retry goes straight back to uploading
        let (token, _) = workflow.begin_upload().unwrap();
        assert_eq!(*workflow.stage(), Stage::Uploading);

        // ... and the retried upload chains into generation as usual
        workflow.finish_upload(token, Ok(uploaded_photo("p2", false)));
        assert_eq!(*workflow.stage(), Stage::Uploaded);
        let (_token, photo_id) = workflow.begin_generate().unwrap();
        assert_eq!(photo_id, "p2");
    }

    #[test]
    fn test_generation_failure_keeps_photo_for_retry() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();
        let (token, _) = workflow.begin_upload().unwrap();
        workflow.finish_upload(token, Ok(uploaded_photo("p1", false)));

        let (token, _) = workflow.begin_generate().unwrap();
        let outcome = workflow.finish_generate(token, Err("model overloaded".to_string()));

        assert_eq!(
            outcome,
            GenerateOutcome::Failed(WorkflowError::GenerationFailed(
                "model overloaded".to_string()
            ))
        );
        assert!(workflow.result().is_none());
        // The uploaded id survives, so retrying does not re-upload
        let (_token, photo_id) = workflow.begin_generate().unwrap();
        assert_eq!(photo_id, "p1");
    }

    #[test]
    fn test_failed_regeneration_keeps_previous_result() {
        let mut workflow = completed_workflow();

        let (token, _) = workflow.begin_generate().unwrap();
        workflow.finish_generate(token, Err("model overloaded".to_string()));

        assert!(matches!(workflow.stage(), Stage::Error(_)));
        assert_eq!(workflow.result().unwrap().id, "g1");
        assert!(workflow.result_preview().is_some());
    }

    #[test]
    fn test_successful_regeneration_replaces_result() {
        let mut workflow = completed_workflow();

        let (token, photo_id) = workflow.begin_generate().unwrap();
        assert_eq!(photo_id, "p1");
        let outcome = workflow.finish_generate(token, Ok(illustration("g2")));

        assert_eq!(outcome, GenerateOutcome::Completed);
        assert_eq!(*workflow.stage(), Stage::Completed);
        assert_eq!(workflow.result().unwrap().id, "g2");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut workflow = completed_workflow();
        workflow.reset();

        assert_eq!(*workflow.stage(), Stage::Idle);
        assert!(workflow.photo().is_none());
        assert!(workflow.uploaded().is_none());
        assert!(workflow.result().is_none());
        assert!(workflow.result_preview().is_none());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut workflow = completed_workflow();
        workflow.reset();

        let generation_after_first = workflow.generation;
        workflow.reset();

        // The second reset finds nothing to release and changes nothing
        assert_eq!(workflow.generation, generation_after_first);
        assert_eq!(*workflow.stage(), Stage::Idle);
    }

    #[test]
    fn test_reset_during_generate_discards_late_success() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();
        let (token, _) = workflow.begin_upload().unwrap();
        workflow.finish_upload(token, Ok(uploaded_photo("p1", false)));
        let (token, _) = workflow.begin_generate().unwrap();

        workflow.reset();

        // The response arrives after the reset and must not resurrect state
        let outcome = workflow.finish_generate(token, Ok(illustration("g1")));
        assert_eq!(outcome, GenerateOutcome::Stale);
        assert_eq!(*workflow.stage(), Stage::Idle);
        assert!(workflow.result().is_none());
    }

    #[test]
    fn test_reset_during_upload_discards_late_response() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();
        let (token, _) = workflow.begin_upload().unwrap();

        workflow.reset();

        let outcome = workflow.finish_upload(token, Ok(uploaded_photo("p1", true)));
        assert_eq!(outcome, UploadOutcome::Stale);
        assert_eq!(*workflow.stage(), Stage::Idle);
        assert!(workflow.uploaded().is_none());
    }

    #[test]
    fn test_new_selection_orphans_pending_call() {
        let mut workflow = Workflow::new();
        workflow.select(PathBuf::from("cat.png")).unwrap();
        let (token, _) = workflow.begin_upload().unwrap();

        // User picks a different photo while the first upload is in flight
        workflow.select(PathBuf::from("dog.jpg")).unwrap();

        let outcome = workflow.finish_upload(token, Ok(uploaded_photo("p1", false)));
        assert_eq!(outcome, UploadOutcome::Stale);
        assert_eq!(*workflow.stage(), Stage::Selected);
        assert!(workflow.uploaded().is_none());
        assert_eq!(workflow.photo().unwrap().file_name, "dog.jpg");
    }

    #[test]
    fn test_new_selection_invalidates_downstream_state() {
        let mut workflow = completed_workflow();

        workflow.select(PathBuf::from("dog.jpg")).unwrap();

        assert_eq!(*workflow.stage(), Stage::Selected);
        assert!(workflow.uploaded().is_none());
        assert!(workflow.result().is_none());
        assert!(workflow.result_preview().is_none());
    }

    #[test]
    fn test_invalid_selection_does_not_disturb_completed_workflow() {
        let mut workflow = completed_workflow();

        let error = workflow.select(PathBuf::from("notes.txt")).unwrap_err();

        assert_eq!(error, WorkflowError::InvalidFileType);
        assert_eq!(*workflow.stage(), Stage::Completed);
        assert_eq!(workflow.result().unwrap().id, "g1");
    }
}
