//! AnnotationService for moving detections between the codec and a store.

use log::{debug, info};
use thiserror::Error;

use crate::codec::{self, CodecError, Detection, TrackAttributes};
use crate::store::backend::{AnnotationStore, Handle};

/// Configuration for the AnnotationService.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// File name given to serialized artifacts
    pub result_file_name: String,
    /// Pipeline name recorded when the caller gives none
    pub default_pipeline: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            result_file_name: "result.csv".to_string(),
            default_pipeline: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("invalid detection json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend failed: {0}")]
    Store(#[source] E),
}

/// Loads and saves detections for videos through an [`AnnotationStore`].
pub struct AnnotationService<S: AnnotationStore> {
    store: S,
    config: ServiceConfig,
}

impl<S> AnnotationService<S>
where
    S: AnnotationStore,
    S::Error: std::error::Error + 'static,
{
    /// Create a new service over `store` with the given config.
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Create a new service with the default configuration.
    pub fn with_default_config(store: S) -> Self {
        Self::new(store, ServiceConfig::default())
    }

    /// Parse the newest artifact of `video_id`.
    ///
    /// Returns `Ok(None)` when the video has no artifacts yet.
    pub fn load_detections(
        &self,
        video_id: &str,
    ) -> Result<Option<Vec<Detection>>, ServiceError<S::Error>> {
        let Some(text) = self
            .store
            .find_latest_annotation_for(video_id)
            .map_err(ServiceError::Store)?
        else {
            debug!("no annotations stored for video {video_id}");
            return Ok(None);
        };
        let detections = codec::parse(&text)?;
        debug!(
            "loaded {} detections for video {video_id}",
            detections.len()
        );
        Ok(Some(detections))
    }

    /// Serialize `detections` and store them as a new artifact of `video_id`.
    pub fn save_detections(
        &mut self,
        video_id: &str,
        pipeline: Option<&str>,
        detections: &[Detection],
        track_attributes: &TrackAttributes,
    ) -> Result<Handle, ServiceError<S::Error>> {
        let text = codec::serialize(detections, track_attributes)?;
        let pipeline = pipeline.or(self.config.default_pipeline.as_deref());
        let handle = self
            .store
            .store_annotation(video_id, pipeline, &self.config.result_file_name, &text)
            .map_err(ServiceError::Store)?;
        info!(
            "stored {} detections for video {video_id} as {handle} (pipeline {})",
            detections.len(),
            pipeline.unwrap_or("-")
        );
        Ok(handle)
    }

    /// Attach an already formatted result file to `video_id` as is.
    pub fn import_result_file(
        &mut self,
        video_id: &str,
        file: Handle,
    ) -> Result<Handle, ServiceError<S::Error>> {
        let handle = self
            .store
            .copy_existing_file(video_id, file)
            .map_err(ServiceError::Store)?;
        info!("imported result file {file} for video {video_id} as {handle}");
        Ok(handle)
    }

    /// Like [`load_detections`](Self::load_detections), rendered as a JSON
    /// array (`null` when there is nothing stored).
    pub fn load_detections_json(&self, video_id: &str) -> Result<String, ServiceError<S::Error>> {
        let detections = self.load_detections(video_id)?;
        Ok(serde_json::to_string(&detections)?)
    }

    /// Like [`save_detections`](Self::save_detections), taking a JSON array
    /// of detections. Track attributes come from the detections themselves.
    pub fn save_detections_json(
        &mut self,
        video_id: &str,
        pipeline: Option<&str>,
        body: &str,
    ) -> Result<Handle, ServiceError<S::Error>> {
        let detections: Vec<Detection> = serde_json::from_str(body)?;
        debug!(
            "decoded {} detections from request body for video {video_id}",
            detections.len()
        );
        self.save_detections(video_id, pipeline, &detections, &TrackAttributes::new())
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a mutable reference to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
