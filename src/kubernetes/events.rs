// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Change events delivered by a ConfigMap or Secret watch.

use crate::error::{HashrollError, Result};
use futures::stream::BoxStream;
use kube::api::WatchEvent;
use kube::{Resource, ResourceExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Created,
    Modified,
    Deleted,
    /// Progress marker carrying only a resource version
    Bookmark,
}

/// A single change to a configuration source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEvent {
    pub event_type: EventType,
    pub name: String,
    pub resource_version: Option<String>,
}

impl SourceEvent {
    /// Whether this event can change the digest of a source
    pub fn is_relevant(&self) -> bool {
        matches!(self.event_type, EventType::Modified | EventType::Deleted)
    }
}

/// Stream of events for one kind in one namespace; ends when the server closes the watch
pub type WatchStream = BoxStream<'static, Result<SourceEvent>>;

/// Translate a raw watch event into a [`SourceEvent`].
///
/// In-band error objects become errors: 410 as [`HashrollError::Expired`],
/// anything else as [`HashrollError::StreamError`].
pub fn convert_watch_event<K>(event: WatchEvent<K>) -> Result<SourceEvent>
where
    K: Resource,
{
    let (event_type, name, resource_version) = match event {
        WatchEvent::Added(obj) => (EventType::Created, obj.name_any(), obj.resource_version()),
        WatchEvent::Modified(obj) => (EventType::Modified, obj.name_any(), obj.resource_version()),
        WatchEvent::Deleted(obj) => (EventType::Deleted, obj.name_any(), obj.resource_version()),
        WatchEvent::Bookmark(bookmark) => (
            EventType::Bookmark,
            String::new(),
            Some(bookmark.metadata.resource_version),
        ),
        WatchEvent::Error(resp) if resp.code == 410 => {
            return Err(HashrollError::Expired(resp.message));
        }
        WatchEvent::Error(resp) => {
            return Err(HashrollError::StreamError(format!(
                "{} ({}): {}",
                resp.reason, resp.code, resp.message
            )));
        }
    };

    Ok(SourceEvent {
        event_type,
        name,
        resource_version,
    })
}
