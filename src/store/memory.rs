//! In-memory annotation store.

use thiserror::Error;

use crate::store::backend::{AnnotationStore, Handle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no file with handle {0}")]
    UnknownFile(Handle),
}

/// A stored file, either loose or attached to a video.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub handle: Handle,
    /// Video this artifact belongs to, `None` for loose uploads
    pub video_id: Option<String>,
    pub pipeline: Option<String>,
    pub name: String,
    /// Creation sequence number; larger is newer
    pub created: u64,
    pub body: String,
}

/// Append-only store keeping every artifact in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: Vec<Artifact>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload a loose file that is not yet attached to any video.
    pub fn upload_file(&mut self, name: &str, body: &str) -> Handle {
        self.push(None, None, name, body.to_string())
    }

    pub fn get(&self, handle: Handle) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.handle == handle)
    }

    /// Artifacts attached to `video_id`, oldest first.
    pub fn artifacts_for<'a>(&'a self, video_id: &str) -> impl Iterator<Item = &'a Artifact> {
        self.artifacts
            .iter()
            .filter(move |a| a.video_id.as_deref() == Some(video_id))
    }

    /// Newest artifact attached to `video_id`, with its metadata.
    pub fn latest_artifact_for(&self, video_id: &str) -> Option<&Artifact> {
        self.artifacts_for(video_id).max_by_key(|a| a.created)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    fn push(
        &mut self,
        video_id: Option<&str>,
        pipeline: Option<&str>,
        name: &str,
        body: String,
    ) -> Handle {
        self.next_id += 1;
        let handle = Handle(self.next_id);
        self.artifacts.push(Artifact {
            handle,
            video_id: video_id.map(str::to_string),
            pipeline: pipeline.map(str::to_string),
            name: name.to_string(),
            created: self.next_id,
            body,
        });
        handle
    }
}

impl AnnotationStore for MemoryStore {
    type Error = StoreError;

    fn find_latest_annotation_for(&self, video_id: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.latest_artifact_for(video_id).map(|a| a.body.clone()))
    }

    fn store_annotation(
        &mut self,
        video_id: &str,
        pipeline: Option<&str>,
        file_name: &str,
        body: &str,
    ) -> Result<Handle, Self::Error> {
        Ok(self.push(Some(video_id), pipeline, file_name, body.to_string()))
    }

    fn copy_existing_file(&mut self, video_id: &str, file: Handle) -> Result<Handle, Self::Error> {
        let source = self.get(file).ok_or(StoreError::UnknownFile(file))?;
        let name = source.name.clone();
        let body = source.body.clone();
        Ok(self.push(Some(video_id), None, &name, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_wins_and_history_kept() {
        let mut store = MemoryStore::new();
        assert_eq!(store.find_latest_annotation_for("v1").unwrap(), None);

        store
            .store_annotation("v1", Some("detector"), "result.csv", "first")
            .unwrap();
        store
            .store_annotation("v2", Some("detector"), "result.csv", "other")
            .unwrap();
        let second = store
            .store_annotation("v1", Some("tracker"), "result.csv", "second")
            .unwrap();

        assert_eq!(
            store.find_latest_annotation_for("v1").unwrap().as_deref(),
            Some("second")
        );
        assert_eq!(store.artifacts_for("v1").count(), 2);
        assert_eq!(store.get(second).unwrap().pipeline.as_deref(), Some("tracker"));

        let latest = store.latest_artifact_for("v1").unwrap();
        assert_eq!(latest.handle, second);
        assert_eq!(latest.pipeline.as_deref(), Some("tracker"));
        assert_eq!(latest.created, 3);
        assert!(store.latest_artifact_for("v3").is_none());
    }

    #[test]
    fn test_copy_existing_file() {
        let mut store = MemoryStore::new();
        let upload = store.upload_file("external.csv", "1,,0,0,1,0,1,0.9,0\n");
        assert_eq!(store.find_latest_annotation_for("v1").unwrap(), None);

        let copy = store.copy_existing_file("v1", upload).unwrap();
        assert_ne!(copy, upload);
        let artifact = store.get(copy).unwrap();
        assert_eq!(artifact.video_id.as_deref(), Some("v1"));
        assert_eq!(artifact.pipeline, None);
        assert_eq!(artifact.name, "external.csv");
        assert_eq!(store.len(), 2);

        assert_eq!(
            store.copy_existing_file("v1", Handle(99)).unwrap_err(),
            StoreError::UnknownFile(Handle(99))
        );
    }
}
