//! SSE HTTP handlers for the web layer.
//!
//! This module contains only the Axum handlers for the subscription
//! endpoints. Scoping, relay registration and frame encoding live in the
//! `sse` crate.

pub(crate) mod handler;
