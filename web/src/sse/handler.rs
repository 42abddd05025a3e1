use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use ::sse::{message, EventStream, SubscriptionScope};
use async_stream::stream;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use domain::{task as TaskApi, Id, Tenant};
use events::Channel;
use futures::{Stream, StreamExt};
use log::*;
use std::convert::Infallible;
use std::time::Duration;

/// GET live task changes for the caller's organization.
#[utoipa::path(
    get,
    path = "/subscriptions/tasks",
    responses(
        (status = 200, description = "Event stream of taskUpdate events", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub(crate) async fn task_updates(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(
        "Establishing taskUpdate subscription for user {} in organization {}",
        tenant.user_id(),
        tenant.organization_id()
    );

    let events = open(
        &app_state,
        Channel::TaskUpdate,
        SubscriptionScope::organization(tenant.organization_id()),
    );

    into_sse(events, app_state.config().sse_keep_alive())
}

/// GET live comment changes on one task.
#[utoipa::path(
    get,
    path = "/subscriptions/tasks/{id}/comments",
    params(
        ("id" = String, Path, description = "Task id whose comments to follow")
    ),
    responses(
        (status = 200, description = "Event stream of commentUpdate events", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub(crate) async fn comment_updates(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(task_id): Path<Id>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    let scope = task_scope(&app_state, &tenant, task_id).await?;
    let events = open(&app_state, Channel::CommentUpdate, scope);

    Ok(into_sse(events, app_state.config().sse_keep_alive()))
}

/// GET live attachment changes on one task.
#[utoipa::path(
    get,
    path = "/subscriptions/tasks/{id}/attachments",
    params(
        ("id" = String, Path, description = "Task id whose attachments to follow")
    ),
    responses(
        (status = 200, description = "Event stream of attachmentUpdate events", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub(crate) async fn attachment_updates(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(task_id): Path<Id>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    let scope = task_scope(&app_state, &tenant, task_id).await?;
    let events = open(&app_state, Channel::AttachmentUpdate, scope);

    Ok(into_sse(events, app_state.config().sse_keep_alive()))
}

/// Task scopes are only handed out for tasks inside the caller's organization.
async fn task_scope(
    app_state: &AppState,
    tenant: &Tenant,
    task_id: Id,
) -> Result<SubscriptionScope, Error> {
    let task = TaskApi::find_by_id(app_state.db_conn_ref(), tenant, task_id).await?;
    debug!(
        "Establishing task-scoped subscription for user {} on task {}",
        tenant.user_id(),
        task.id
    );
    Ok(SubscriptionScope::task(tenant.organization_id(), task.id))
}

fn open(app_state: &AppState, channel: Channel, scope: SubscriptionScope) -> EventStream {
    let events = app_state.subscriptions.open(channel, scope);
    debug!(
        "{} live {channel} subscriptions",
        app_state.subscriptions.listener_count(channel)
    );
    events
}

// The returned stream owns `events`; axum drops it when the client goes
// away, which unregisters the listener.
fn into_sse(
    mut events: EventStream,
    keep_alive: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = stream! {
        while let Some(event) = events.next().await {
            match message::encode(&event) {
                Ok(frame) => yield Ok(frame),
                Err(e) => warn!("Dropping {} event that failed to encode: {e}", event.channel()),
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(keep_alive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::sse::Subscriptions;
    use axum::body::BodyDataStream;
    use axum::response::IntoResponse;
    use events::{EventEmitter, Relay, TaskEvent};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::time::timeout;

    async fn next_frame(body: &mut BodyDataStream) -> String {
        let chunk = timeout(Duration::from_secs(1), body.next())
            .await
            .expect("no frame within a second")
            .expect("stream ended")
            .unwrap();
        String::from_utf8(chunk.to_vec()).unwrap()
    }

    fn field<'a>(frame: &'a str, name: &str) -> Option<&'a str> {
        frame
            .lines()
            .find_map(|line| line.strip_prefix(name)?.strip_prefix(':'))
            .map(str::trim_start)
    }

    fn into_body<S>(sse: Sse<S>) -> BodyDataStream
    where
        S: Stream<Item = Result<Event, Infallible>> + Send + 'static,
    {
        sse.into_response().into_body().into_data_stream()
    }

    #[tokio::test]
    async fn relayed_events_are_written_as_named_sse_frames() {
        let relay = Arc::new(Relay::new());
        let subscriptions = Subscriptions::new(Arc::clone(&relay));
        let organization_id = Id::new_v4();
        let task_id = Id::new_v4();
        let events = subscriptions.open(
            Channel::TaskUpdate,
            SubscriptionScope::organization(organization_id),
        );
        let mut body = into_body(into_sse(events, Duration::from_secs(15)));

        relay.emit_task_update(TaskEvent::TaskCreated {
            organization_id,
            task_id,
            data: json!({"title": "Wire it up"}),
        });

        let frame = next_frame(&mut body).await;
        assert_eq!(field(&frame, "event"), Some("taskUpdate"));
        let data: Value = serde_json::from_str(field(&frame, "data").unwrap()).unwrap();
        assert_eq!(data["type"], "TASK_CREATED");
        assert_eq!(data["organizationId"], organization_id.to_string());
        assert_eq!(data["taskId"], task_id.to_string());
    }

    #[tokio::test]
    async fn dropping_the_response_body_unregisters_the_listener() {
        let relay = Arc::new(Relay::new());
        let subscriptions = Subscriptions::new(Arc::clone(&relay));
        let events = subscriptions.open(
            Channel::TaskUpdate,
            SubscriptionScope::organization(Id::new_v4()),
        );
        let body = into_body(into_sse(events, Duration::from_secs(15)));
        assert_eq!(relay.listener_count(Channel::TaskUpdate), 1);

        drop(body);

        assert_eq!(relay.listener_count(Channel::TaskUpdate), 0);
    }

    // We need to gate seaORM's mock feature behind conditional compilation because
    // the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
    #[cfg(feature = "mock")]
    mod with_database {
        use super::*;
        use crate::router::define_routes;
        use crate::test_support::{app_state, authorized, authorized_get, signed_in};
        use axum::body::Body;
        use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
        use domain::{projects, task_status::TaskStatus, tasks};
        use events::Event as RelayEvent;
        use sea_orm::{DatabaseBackend, MockDatabase};
        use tower::ServiceExt;

        fn task_in(organization_id: Id, project_id: Id) -> tasks::Model {
            let now = chrono::Utc::now();
            tasks::Model {
                id: Id::new_v4(),
                project_id,
                organization_id,
                title: "Review the relay".to_owned(),
                description: None,
                status: TaskStatus::Todo,
                assignee_id: None,
                due_date: None,
                created_by: Id::new_v4(),
                created_at: now.into(),
                updated_at: now.into(),
            }
        }

        fn project_in(organization_id: Id) -> projects::Model {
            let now = chrono::Utc::now();
            projects::Model {
                id: Id::new_v4(),
                organization_id,
                name: "Relay".to_owned(),
                description: None,
                created_at: now.into(),
                updated_at: now.into(),
            }
        }

        #[tokio::test]
        async fn task_in_another_organization_is_not_found_and_registers_nothing() {
            let db = signed_in(
                MockDatabase::new(DatabaseBackend::Postgres),
                Id::new_v4(),
                Id::new_v4(),
            )
            .append_query_results(vec![Vec::<tasks::Model>::new()]);
            let state = app_state(db);
            let relay = Arc::clone(&state.relay);

            let response = define_routes(state)
                .oneshot(authorized_get(&format!(
                    "/subscriptions/tasks/{}/comments",
                    Id::new_v4()
                )))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(relay.listener_count(Channel::CommentUpdate), 0);
        }

        #[tokio::test]
        async fn owned_task_opens_an_event_stream_for_the_lifetime_of_the_response() {
            let organization_id = Id::new_v4();
            let task = task_in(organization_id, Id::new_v4());
            let db = signed_in(
                MockDatabase::new(DatabaseBackend::Postgres),
                Id::new_v4(),
                organization_id,
            )
            .append_query_results(vec![vec![task.clone()]]);
            let state = app_state(db);
            let relay = Arc::clone(&state.relay);

            let response = define_routes(state)
                .oneshot(authorized_get(&format!(
                    "/subscriptions/tasks/{}/attachments",
                    task.id
                )))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers().get(CONTENT_TYPE).unwrap(),
                "text/event-stream"
            );
            assert_eq!(relay.listener_count(Channel::AttachmentUpdate), 1);

            drop(response);

            assert_eq!(relay.listener_count(Channel::AttachmentUpdate), 0);
        }

        #[tokio::test]
        async fn created_task_reaches_an_open_subscription_exactly_once() {
            let user_id = Id::new_v4();
            let organization_id = Id::new_v4();
            let project = project_in(organization_id);
            let task = task_in(organization_id, project.id);
            // One sign-in for the subscription, one for the create request
            let db = signed_in(
                signed_in(
                    MockDatabase::new(DatabaseBackend::Postgres),
                    user_id,
                    organization_id,
                ),
                user_id,
                organization_id,
            )
            .append_query_results(vec![vec![project.clone()]])
            .append_query_results(vec![vec![task.clone()]]);
            let state = app_state(db);
            let relay = Arc::clone(&state.relay);
            let router = define_routes(state);

            let subscription = router
                .clone()
                .oneshot(authorized_get("/subscriptions/tasks"))
                .await
                .unwrap();
            assert_eq!(subscription.status(), StatusCode::OK);
            let mut body = subscription.into_body().into_data_stream();

            let request = authorized(Request::builder().method("POST").uri("/tasks"))
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"project_id": project.id, "title": "Review the relay"}).to_string(),
                ))
                .unwrap();
            let created = router.oneshot(request).await.unwrap();
            assert_eq!(created.status(), StatusCode::OK);

            let frame = next_frame(&mut body).await;
            assert_eq!(field(&frame, "event"), Some("taskUpdate"));
            let data: Value = serde_json::from_str(field(&frame, "data").unwrap()).unwrap();
            assert_eq!(data["type"], "TASK_CREATED");
            assert_eq!(data["organizationId"], organization_id.to_string());
            assert_eq!(data["taskId"], task.id.to_string());
            let relayed: RelayEvent = serde_json::from_value(data).unwrap();
            assert_eq!(relayed.channel(), Channel::TaskUpdate);

            assert!(timeout(Duration::from_millis(100), body.next())
                .await
                .is_err());
            assert_eq!(relay.listener_count(Channel::TaskUpdate), 1);
        }
    }
}
