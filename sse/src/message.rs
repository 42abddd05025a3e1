use axum::response::sse::Event as SseEvent;
use events::Event;

/// Encodes a relay event as one SSE frame.
///
/// The SSE `event` field carries the channel name so clients can attach one
/// `EventSource` listener per channel; `data` is the JSON payload including
/// its `type` tag.
pub fn encode(event: &Event) -> Result<SseEvent, serde_json::Error> {
    let data = serde_json::to_string(event)?;
    Ok(SseEvent::default()
        .event(event.channel().as_str())
        .data(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::response::{sse::Sse, IntoResponse};
    use events::{AttachmentEvent, Id, TaskEvent};
    use serde_json::{json, Value};
    use std::convert::Infallible;

    /// Renders frames the way an axum SSE response writes them to the wire.
    async fn render(frames: Vec<SseEvent>) -> String {
        let stream = futures::stream::iter(frames.into_iter().map(Ok::<_, Infallible>));
        let body = Sse::new(stream).into_response().into_body();
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn field<'a>(frame: &'a str, name: &str) -> Option<&'a str> {
        frame
            .lines()
            .find_map(|line| line.strip_prefix(name)?.strip_prefix(':'))
            .map(str::trim_start)
    }

    #[tokio::test]
    async fn task_events_are_framed_on_the_task_update_channel() {
        let task_id = Id::new_v4();
        let event = Event::Task(TaskEvent::TaskUpdated {
            organization_id: Id::new_v4(),
            task_id,
            data: json!({"title": "Ship it"}),
        });

        let frame = render(vec![encode(&event).unwrap()]).await;

        assert_eq!(field(&frame, "event"), Some("taskUpdate"));
        let data: Value = serde_json::from_str(field(&frame, "data").unwrap()).unwrap();
        assert_eq!(data["type"], "TASK_UPDATED");
        assert_eq!(data["taskId"], task_id.to_string());
        assert_eq!(data["data"]["title"], "Ship it");
    }

    #[tokio::test]
    async fn attachment_events_are_framed_on_the_attachment_update_channel() {
        let attachment_id = Id::new_v4();
        let event = Event::Attachment(AttachmentEvent::AttachmentDeleted {
            organization_id: Id::new_v4(),
            task_id: Id::new_v4(),
            attachment_id,
            data: json!(null),
        });

        let frame = render(vec![encode(&event).unwrap()]).await;

        assert_eq!(field(&frame, "event"), Some("attachmentUpdate"));
        let data: Value = serde_json::from_str(field(&frame, "data").unwrap()).unwrap();
        assert_eq!(data["type"], "ATTACHMENT_DELETED");
        assert_eq!(data["attachmentId"], attachment_id.to_string());
    }
}
