/// Local photo handling module
///
/// This module handles:
/// - Validating selected files and allocating previews (select.rs)
/// - Decoding and saving generated illustrations (download.rs)

pub mod download;
pub mod select;

pub use select::LocalPhoto;
