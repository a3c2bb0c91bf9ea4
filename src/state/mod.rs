/// State management module
///
/// This module handles all application state, including:
/// - The transformation workflow state machine (workflow.rs)
/// - The fetched gallery of past creations (gallery.rs)

pub mod gallery;
pub mod workflow;
