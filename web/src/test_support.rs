use crate::AppState;
use axum::body::Body;
use axum::http::{header::AUTHORIZATION, Request};
use chrono::{Duration, Utc};
use clap::Parser;
use domain::{organization_members, roles::Role, sessions, Id};
use events::Relay;
use sea_orm::MockDatabase;
use service::config::Config;
use std::sync::Arc;

pub(crate) const TOKEN: &str = "session-token";

pub(crate) fn session(user_id: Id, organization_id: Id, expires_in: Duration) -> sessions::Model {
    let now = Utc::now();
    sessions::Model {
        token: TOKEN.to_owned(),
        user_id,
        organization_id,
        expires_at: (now + expires_in).into(),
        created_at: now.into(),
    }
}

pub(crate) fn membership(user_id: Id, organization_id: Id) -> organization_members::Model {
    let now = Utc::now();
    organization_members::Model {
        id: Id::new_v4(),
        organization_id,
        user_id,
        role: Role::Member,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

/// Queues the two lookups a valid bearer token resolves through.
pub(crate) fn signed_in(db: MockDatabase, user_id: Id, organization_id: Id) -> MockDatabase {
    db.append_query_results(vec![vec![session(
        user_id,
        organization_id,
        Duration::hours(1),
    )]])
    .append_query_results(vec![vec![membership(user_id, organization_id)]])
}

pub(crate) fn app_state(db: MockDatabase) -> AppState {
    let db = Arc::new(db.into_connection());
    let config = Config::try_parse_from(["task_relay"]).unwrap();
    AppState::new(service::AppState::new(config, &db), Arc::new(Relay::new()))
}

pub(crate) fn authorized(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder.header(AUTHORIZATION, format!("Bearer {TOKEN}"))
}

pub(crate) fn authorized_get(uri: &str) -> Request<Body> {
    authorized(Request::builder().uri(uri))
        .body(Body::empty())
        .unwrap()
}
