//! Storage integration for detection annotations.
//!
//! This module provides the trait a storage backend implements and a
//! service that moves detections between the codec and that backend.

mod backend;
mod memory;
mod service;

pub use backend::{AnnotationStore, Handle};
pub use memory::{Artifact, MemoryStore, StoreError};
pub use service::{AnnotationService, ServiceConfig, ServiceError};
