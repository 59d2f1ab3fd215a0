//! Protocol mapper — bidirectional conversion between the internal
//! [`Activity`] projection and the wire-facing [`Message`]/[`Artifact`] types.
//!
//! Pure and stateless except for the process-wide JSON-schema cache, which
//! is insert-only and safe under concurrent readers/writers.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell_like_lazy::Lazy;
use serde_json::Value;
use uuid::Uuid;

use crate::types::{
    Activity, ActivityType, Artifact, Attachment, ChannelAccount, ConversationRef, DeliveryMode,
    Entity, FileContent, FileWithBytes, FileWithUri, Message, Part, Role,
    CHANNEL_ACCOUNT_AGENT, CHANNEL_ACCOUNT_USER, CHANNEL_ID_A2A,
    WELL_KNOWN_STREAM_INFO_ENTITY_TYPES,
};

/// Process-wide memoized mapping from entity type name to its JSON schema.
///
/// Initialize-on-first-use, insert-only: a schema is computed exactly once
/// per distinct `entity.type` value seen by this process and reused after.
static SCHEMA_CACHE: Lazy<RwLock<HashMap<String, Value>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the (memoized) JSON schema describing `entity_type`.
///
/// This host does not have access to the concrete Rust types entities are
/// drawn from (they arrive as already-decoded `serde_json::Value`s), so the
/// "schema" produced here is a minimal structural stand-in — a `type: object`
/// schema tagged with the entity's type name — sufficient to round-trip
/// through the cache and to give a receiver a stable, memoized identity to
/// key off of.
pub fn json_schema_for_entity_type(entity_type: &str) -> Value {
    if let Some(cached) = SCHEMA_CACHE.read().unwrap().get(entity_type) {
        return cached.clone();
    }

    let schema = serde_json::json!({
        "type": "object",
        "title": entity_type,
    });

    SCHEMA_CACHE
        .write()
        .unwrap()
        .entry(entity_type.to_string())
        .or_insert_with(|| schema.clone());

    schema
}

/// Pure, stateless bidirectional converter between [`Activity`] and the
/// protocol's `Message`/`Artifact` shapes.
pub struct ProtocolMapper;

impl ProtocolMapper {
    /// Converts an outbound [`Activity`] into an [`Artifact`].
    ///
    /// Returns `None` when the activity produces no parts at all — the
    /// empty-artifact-is-null edge policy (§4.2).
    pub fn activity_to_artifact(activity: &Activity) -> Option<Artifact> {
        let parts = Self::activity_to_parts(activity);
        if parts.is_empty() {
            return None;
        }

        Some(Artifact {
            artifact_id: Uuid::new_v4().to_string(),
            name: None,
            description: None,
            parts,
            metadata: None,
            extensions: None,
        })
    }

    /// Converts an outbound [`Activity`] into a [`Message`], for producers
    /// that chose message-form (a non-streaming final reply, or an
    /// informative status message).
    pub fn activity_to_message(
        activity: &Activity,
        task_id: Option<String>,
        context_id: Option<String>,
    ) -> Option<Message> {
        let parts = Self::activity_to_parts(activity);
        if parts.is_empty() {
            return None;
        }

        Some(Message {
            message_id: activity.id.clone(),
            role: Role::Agent,
            kind: "message".to_string(),
            parts,
            context_id,
            task_id,
            metadata: None,
            extensions: None,
            reference_task_ids: None,
        })
    }

    fn activity_to_parts(activity: &Activity) -> Vec<Part> {
        let mut parts = Vec::new();

        if let Some(text) = &activity.text {
            if !text.is_empty() {
                parts.push(Part::Text {
                    text: text.clone(),
                    metadata: None,
                });
            }
        }

        if let Some(value) = &activity.value {
            parts.push(Part::Data {
                data: value.clone(),
                metadata: None,
            });
        }

        if let Some(attachments) = &activity.attachments {
            for attachment in attachments {
                if let Some(part) = Self::attachment_to_part(attachment) {
                    parts.push(part);
                }
            }
        }

        if let Some(entities) = &activity.entities {
            for entity in entities {
                if WELL_KNOWN_STREAM_INFO_ENTITY_TYPES.contains(&entity.r#type.as_str()) {
                    continue;
                }
                parts.push(Part::Data {
                    data: entity.value.clone(),
                    metadata: Some(serde_json::json!({
                        "schema": json_schema_for_entity_type(&entity.r#type),
                    })),
                });
            }
        }

        parts
    }

    fn attachment_to_part(attachment: &Attachment) -> Option<Part> {
        if let Some(uri) = &attachment.content_url {
            return Some(Part::File {
                file: FileContent::Uri(FileWithUri {
                    uri: uri.clone(),
                    mime_type: attachment.content_type.clone(),
                    name: attachment.name.clone(),
                }),
                metadata: None,
            });
        }

        if let Some(content) = &attachment.content {
            return Some(Part::File {
                file: FileContent::Bytes(FileWithBytes {
                    bytes: content.clone(),
                    mime_type: attachment.content_type.clone(),
                    name: attachment.name.clone(),
                }),
                metadata: None,
            });
        }

        None
    }

    /// Converts an inbound [`Message`] into an [`Activity`] projection.
    ///
    /// `from_user` selects ingress direction: `true` for a client-authored
    /// message (the common case), `false` for a host-authored message being
    /// re-projected (egress direction), which swaps `from`/`recipient`.
    pub fn message_to_activity(message: &Message, from_user: bool) -> Activity {
        let mut text_parts = Vec::new();
        let mut attachments = Vec::new();
        let mut last_value = None;

        for part in &message.parts {
            match part {
                Part::Text { text, .. } => text_parts.push(text.clone()),
                Part::File { file, .. } => attachments.push(Self::file_to_attachment(file)),
                Part::Data { data, .. } => last_value = Some(data.clone()),
            }
        }

        let (from, recipient) = if from_user {
            (
                ChannelAccount {
                    id: CHANNEL_ACCOUNT_USER.to_string(),
                },
                ChannelAccount {
                    id: CHANNEL_ACCOUNT_AGENT.to_string(),
                },
            )
        } else {
            (
                ChannelAccount {
                    id: CHANNEL_ACCOUNT_AGENT.to_string(),
                },
                ChannelAccount {
                    id: CHANNEL_ACCOUNT_USER.to_string(),
                },
            )
        };

        Activity {
            r#type: ActivityType::Message,
            id: message.message_id.clone(),
            channel_id: CHANNEL_ID_A2A.to_string(),
            delivery_mode: DeliveryMode::ExpectReplies,
            conversation: ConversationRef {
                id: message.context_id.clone().unwrap_or_default(),
            },
            from,
            recipient,
            text: if text_parts.is_empty() {
                None
            } else {
                Some(text_parts.join(""))
            },
            value: last_value,
            attachments: if attachments.is_empty() {
                None
            } else {
                Some(attachments)
            },
            entities: None,
            input_hint: None,
            code: None,
        }
    }

    fn file_to_attachment(file: &FileContent) -> Attachment {
        match file {
            FileContent::Uri(f) => Attachment {
                content_type: f.mime_type.clone(),
                content_url: Some(f.uri.clone()),
                content: None,
                name: f.name.clone(),
            },
            FileContent::Bytes(f) => Attachment {
                content_type: f.mime_type.clone(),
                content_url: None,
                content: Some(f.bytes.clone()),
                name: f.name.clone(),
            },
        }
    }
}

/// Minimal `Lazy<T>`, avoiding a dependency on `once_cell`/`std::sync::OnceLock`
/// version skew: backed by `std::sync::OnceLock`, matching its API shape
/// closely enough for this module's single use site.
mod once_cell_like_lazy {
    use std::sync::OnceLock;

    pub struct Lazy<T> {
        cell: OnceLock<T>,
        init: fn() -> T,
    }

    impl<T> Lazy<T> {
        pub const fn new(init: fn() -> T) -> Self {
            Self {
                cell: OnceLock::new(),
                init,
            }
        }
    }

    impl<T> std::ops::Deref for Lazy<T> {
        type Target = T;

        fn deref(&self) -> &T {
            self.cell.get_or_init(self.init)
        }
    }
}
