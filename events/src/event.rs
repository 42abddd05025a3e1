use crate::Id;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Trait for getting the wire name of an event's `type` discriminator
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// A named category of events sharing one listener list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    TaskUpdate,
    CommentUpdate,
    AttachmentUpdate,
}

impl Channel {
    pub const ALL: [Channel; 3] = [
        Channel::TaskUpdate,
        Channel::CommentUpdate,
        Channel::AttachmentUpdate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::TaskUpdate => "taskUpdate",
            Channel::CommentUpdate => "commentUpdate",
            Channel::AttachmentUpdate => "attachmentUpdate",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ChannelParseError(pub String);

impl fmt::Display for ChannelParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown channel: {}", self.0)
    }
}

impl std::error::Error for ChannelParseError {}

impl FromStr for Channel {
    type Err = ChannelParseError;

    fn from_str(name: &str) -> Result<Channel, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == name)
            .ok_or_else(|| ChannelParseError(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum TaskEvent {
    TaskCreated {
        organization_id: Id,
        task_id: Id,
        /// Complete serialized task row as committed.
        data: Value,
    },
    TaskUpdated {
        organization_id: Id,
        task_id: Id,
        data: Value,
    },
    TaskDeleted {
        organization_id: Id,
        task_id: Id,
        /// The row as it was immediately before removal.
        data: Value,
    },
}

impl TaskEvent {
    pub fn organization_id(&self) -> Id {
        match self {
            TaskEvent::TaskCreated {
                organization_id, ..
            }
            | TaskEvent::TaskUpdated {
                organization_id, ..
            }
            | TaskEvent::TaskDeleted {
                organization_id, ..
            } => *organization_id,
        }
    }

    pub fn task_id(&self) -> Id {
        match self {
            TaskEvent::TaskCreated { task_id, .. }
            | TaskEvent::TaskUpdated { task_id, .. }
            | TaskEvent::TaskDeleted { task_id, .. } => *task_id,
        }
    }
}

impl EventType for TaskEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TaskEvent::TaskCreated { .. } => "TASK_CREATED",
            TaskEvent::TaskUpdated { .. } => "TASK_UPDATED",
            TaskEvent::TaskDeleted { .. } => "TASK_DELETED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CommentEvent {
    CommentCreated {
        organization_id: Id,
        task_id: Id,
        comment_id: Id,
        data: Value,
    },
    CommentUpdated {
        organization_id: Id,
        task_id: Id,
        comment_id: Id,
        data: Value,
    },
    CommentDeleted {
        organization_id: Id,
        task_id: Id,
        comment_id: Id,
        data: Value,
    },
}

impl CommentEvent {
    pub fn organization_id(&self) -> Id {
        match self {
            CommentEvent::CommentCreated {
                organization_id, ..
            }
            | CommentEvent::CommentUpdated {
                organization_id, ..
            }
            | CommentEvent::CommentDeleted {
                organization_id, ..
            } => *organization_id,
        }
    }

    pub fn task_id(&self) -> Id {
        match self {
            CommentEvent::CommentCreated { task_id, .. }
            | CommentEvent::CommentUpdated { task_id, .. }
            | CommentEvent::CommentDeleted { task_id, .. } => *task_id,
        }
    }

    pub fn comment_id(&self) -> Id {
        match self {
            CommentEvent::CommentCreated { comment_id, .. }
            | CommentEvent::CommentUpdated { comment_id, .. }
            | CommentEvent::CommentDeleted { comment_id, .. } => *comment_id,
        }
    }
}

impl EventType for CommentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CommentEvent::CommentCreated { .. } => "COMMENT_CREATED",
            CommentEvent::CommentUpdated { .. } => "COMMENT_UPDATED",
            CommentEvent::CommentDeleted { .. } => "COMMENT_DELETED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum AttachmentEvent {
    AttachmentCreated {
        organization_id: Id,
        task_id: Id,
        attachment_id: Id,
        data: Value,
    },
    AttachmentDeleted {
        organization_id: Id,
        task_id: Id,
        attachment_id: Id,
        data: Value,
    },
}

impl AttachmentEvent {
    pub fn organization_id(&self) -> Id {
        match self {
            AttachmentEvent::AttachmentCreated {
                organization_id, ..
            }
            | AttachmentEvent::AttachmentDeleted {
                organization_id, ..
            } => *organization_id,
        }
    }

    pub fn task_id(&self) -> Id {
        match self {
            AttachmentEvent::AttachmentCreated { task_id, .. }
            | AttachmentEvent::AttachmentDeleted { task_id, .. } => *task_id,
        }
    }

    pub fn attachment_id(&self) -> Id {
        match self {
            AttachmentEvent::AttachmentCreated { attachment_id, .. }
            | AttachmentEvent::AttachmentDeleted { attachment_id, .. } => *attachment_id,
        }
    }
}

impl EventType for AttachmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AttachmentEvent::AttachmentCreated { .. } => "ATTACHMENT_CREATED",
            AttachmentEvent::AttachmentDeleted { .. } => "ATTACHMENT_DELETED",
        }
    }
}

/// Any event the relay can carry. The variant determines the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Event {
    Task(TaskEvent),
    Comment(CommentEvent),
    Attachment(AttachmentEvent),
}

impl Event {
    pub fn channel(&self) -> Channel {
        match self {
            Event::Task(_) => Channel::TaskUpdate,
            Event::Comment(_) => Channel::CommentUpdate,
            Event::Attachment(_) => Channel::AttachmentUpdate,
        }
    }

    /// Tenant the event belongs to; the mandatory filter dimension.
    pub fn organization_id(&self) -> Id {
        match self {
            Event::Task(event) => event.organization_id(),
            Event::Comment(event) => event.organization_id(),
            Event::Attachment(event) => event.organization_id(),
        }
    }

    /// Task the event concerns; the optional secondary filter dimension.
    pub fn task_id(&self) -> Id {
        match self {
            Event::Task(event) => event.task_id(),
            Event::Comment(event) => event.task_id(),
            Event::Attachment(event) => event.task_id(),
        }
    }
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::Task(event) => event.event_type(),
            Event::Comment(event) => event.event_type(),
            Event::Attachment(event) => event.event_type(),
        }
    }
}

impl From<TaskEvent> for Event {
    fn from(event: TaskEvent) -> Self {
        Event::Task(event)
    }
}

impl From<CommentEvent> for Event {
    fn from(event: CommentEvent) -> Self {
        Event::Comment(event)
    }
}

impl From<AttachmentEvent> for Event {
    fn from(event: AttachmentEvent) -> Self {
        Event::Attachment(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_event_serializes_with_type_tag_and_camel_case_fields() {
        let organization_id = Id::new_v4();
        let task_id = Id::new_v4();
        let event = TaskEvent::TaskCreated {
            organization_id,
            task_id,
            data: json!({"title": "Write docs"}),
        };

        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "TASK_CREATED",
                "organizationId": organization_id,
                "taskId": task_id,
                "data": {"title": "Write docs"},
            })
        );
    }

    #[test]
    fn event_type_matches_serialized_tag() {
        let event = Event::Attachment(AttachmentEvent::AttachmentDeleted {
            organization_id: Id::new_v4(),
            task_id: Id::new_v4(),
            attachment_id: Id::new_v4(),
            data: Value::Null,
        });

        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], event.event_type());
        assert_eq!(event.channel(), Channel::AttachmentUpdate);
    }

    #[test]
    fn untagged_event_deserializes_into_the_matching_channel() {
        let comment_id = Id::new_v4();
        let value = json!({
            "type": "COMMENT_UPDATED",
            "organizationId": Id::new_v4(),
            "taskId": Id::new_v4(),
            "commentId": comment_id,
            "data": {"body": "edited"},
        });

        let event: Event = serde_json::from_value(value).unwrap();

        match event {
            Event::Comment(comment) => assert_eq!(comment.comment_id(), comment_id),
            other => panic!("expected a comment event, got {other:?}"),
        }
    }

    #[test]
    fn channel_names_parse_back() {
        for channel in Channel::ALL {
            assert_eq!(channel.as_str().parse::<Channel>(), Ok(channel));
        }
        assert!("noteUpdate".parse::<Channel>().is_err());
    }
}
