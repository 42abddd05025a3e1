use crate::{controller::health_check_controller, sse::handler as sse_handler, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{
    attachment_controller, comment_controller, organization_controller, project_controller,
    task_controller,
};

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Task Relay API"
        ),
        paths(
            health_check_controller::health_check,
            organization_controller::read,
            project_controller::create,
            project_controller::index,
            project_controller::tasks,
            task_controller::create,
            task_controller::read,
            task_controller::update,
            task_controller::delete,
            comment_controller::index,
            comment_controller::create,
            comment_controller::update,
            comment_controller::delete,
            attachment_controller::index,
            attachment_controller::create,
            attachment_controller::delete,
            sse_handler::task_updates,
            sse_handler::comment_updates,
            sse_handler::attachment_updates,
        ),
        components(
            schemas(
                domain::attachments::Model,
                domain::comments::Model,
                domain::organizations::Model,
                domain::projects::Model,
                domain::tasks::Model,
                comment_controller::CommentRequest,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "task_relay", description = "Multi-tenant task tracker with live updates")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer session token requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::builder().scheme(HttpAuthScheme::Bearer).build()),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(organization_routes(app_state.clone()))
        .merge(project_routes(app_state.clone()))
        .merge(task_routes(app_state.clone()))
        .merge(comment_routes(app_state.clone()))
        .merge(attachment_routes(app_state.clone()))
        .merge(subscription_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn organization_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/organization", get(organization_controller::read))
        .with_state(app_state)
}

fn project_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/projects", post(project_controller::create))
        .route("/projects", get(project_controller::index))
        .route("/projects/:id/tasks", get(project_controller::tasks))
        .with_state(app_state)
}

fn task_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/tasks", post(task_controller::create))
        .route("/tasks/:id", get(task_controller::read))
        .route("/tasks/:id", put(task_controller::update))
        .route("/tasks/:id", delete(task_controller::delete))
        .with_state(app_state)
}

fn comment_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/tasks/:id/comments", get(comment_controller::index))
        .route("/tasks/:id/comments", post(comment_controller::create))
        .route("/comments/:id", put(comment_controller::update))
        .route("/comments/:id", delete(comment_controller::delete))
        .with_state(app_state)
}

fn attachment_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/tasks/:id/attachments", get(attachment_controller::index))
        .route("/tasks/:id/attachments", post(attachment_controller::create))
        .route("/attachments/:id", delete(attachment_controller::delete))
        .with_state(app_state)
}

fn subscription_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/subscriptions/tasks", get(sse_handler::task_updates))
        .route(
            "/subscriptions/tasks/:id/comments",
            get(sse_handler::comment_updates),
        )
        .route(
            "/subscriptions/tasks/:id/attachments",
            get(sse_handler::attachment_updates),
        )
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use clap::Parser;
    use events::Relay;
    use sea_orm::DatabaseConnection;
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let db = Arc::new(DatabaseConnection::Disconnected);
        let service_state = service::AppState::new(Config::try_parse_from(["task_relay"]).unwrap(), &db);
        AppState::new(service_state, Arc::new(Relay::new()))
    }

    async fn get_status(uri: &str) -> StatusCode {
        let router = define_routes(test_state());
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        assert_eq!(get_status("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn api_routes_require_a_bearer_token() {
        assert_eq!(get_status("/projects").await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status("/tasks/00000000-0000-0000-0000-000000000000").await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn subscriptions_require_a_bearer_token_and_register_nothing() {
        let state = test_state();
        let relay = Arc::clone(&state.relay);
        let router = define_routes(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/subscriptions/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(relay.listener_count(events::Channel::TaskUpdate), 0);
    }

    #[test]
    fn openapi_lists_the_subscription_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/subscriptions/tasks"));
        assert!(doc
            .paths
            .paths
            .contains_key("/subscriptions/tasks/{id}/comments"));
        assert!(doc.components.is_some());
    }
}
