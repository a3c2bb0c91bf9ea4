/// UI module
///
/// Display-only view builders; every interaction dispatches back through
/// `crate::Message`:
/// - Home screen with the transformation workspace (home.rs)
/// - Gallery grid of past creations (gallery.rs)

pub mod gallery;
pub mod home;
