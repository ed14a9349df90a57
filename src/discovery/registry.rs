//! Metadata sources.
//!
//! # Responsibilities
//! - Define the capability the collector reads declarations through
//! - Provide an explicit registration table implementing it
//!
//! # Design Decisions
//! - Declarations are registered up front; nothing is introspected at runtime
//! - Re-registering a handler type replaces its declarations

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::discovery::declaration::HandlerMetadata;

/// Yields the routing declarations of a handler type.
pub trait MetadataSource: Send + Sync + fmt::Debug {
    /// Declarations for `handler_id`, or `None` if the type is unknown.
    fn metadata(&self, handler_id: &str) -> Option<&HandlerMetadata>;
}

impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    fn metadata(&self, handler_id: &str) -> Option<&HandlerMetadata> {
        (**self).metadata(handler_id)
    }
}

impl<T: MetadataSource + ?Sized> MetadataSource for Arc<T> {
    fn metadata(&self, handler_id: &str) -> Option<&HandlerMetadata> {
        (**self).metadata(handler_id)
    }
}

/// Handler declarations registered by the embedding application.
#[derive(Debug, Clone, Default)]
pub struct ControllerRegistry {
    handlers: IndexMap<String, HandlerMetadata>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler type, returning the declarations it replaced.
    pub fn register(&mut self, metadata: HandlerMetadata) -> Option<HandlerMetadata> {
        self.handlers.insert(metadata.id().to_string(), metadata)
    }

    pub fn with(mut self, metadata: HandlerMetadata) -> Self {
        self.register(metadata);
        self
    }

    /// Registered handler type ids in registration order.
    pub fn handler_ids(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl MetadataSource for ControllerRegistry {
    fn metadata(&self, handler_id: &str) -> Option<&HandlerMetadata> {
        self.handlers.get(handler_id)
    }
}
