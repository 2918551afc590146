//! Trait for annotation storage backends.

use std::fmt;

/// Opaque identifier of a stored file or artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Trait for the object store that keeps annotation artifacts per video.
///
/// Artifacts are append-only: storing never replaces an earlier artifact,
/// and "latest" means most recently created.
///
/// # Example
///
/// ```ignore
/// use viame_csv_rs::store::{AnnotationStore, Handle};
///
/// struct MyStore {
///     // Your storage client here
/// }
///
/// impl AnnotationStore for MyStore {
///     type Error = std::io::Error;
///
///     fn find_latest_annotation_for(&self, video_id: &str) -> Result<Option<String>, Self::Error> {
///         Ok(None)
///     }
///     // ...
/// }
/// ```
pub trait AnnotationStore {
    /// Error type for storage failures.
    type Error;

    /// Text of the newest artifact attached to `video_id`, if any.
    fn find_latest_annotation_for(&self, video_id: &str) -> Result<Option<String>, Self::Error>;

    /// Persist `body` as a new artifact of `video_id`.
    ///
    /// # Arguments
    /// * `pipeline` - Name of the pipeline that produced the detections
    /// * `file_name` - Name of the file holding `body`
    fn store_annotation(
        &mut self,
        video_id: &str,
        pipeline: Option<&str>,
        file_name: &str,
        body: &str,
    ) -> Result<Handle, Self::Error>;

    /// Attach an existing, already formatted file to `video_id` as a new
    /// artifact without a pipeline name.
    fn copy_existing_file(&mut self, video_id: &str, file: Handle) -> Result<Handle, Self::Error>;
}
