//! Server-Sent Events (SSE) subscriptions over the event relay.
//!
//! This crate turns relay listener registrations into per-connection event
//! streams that the web layer exposes to authenticated clients.
//!
//! # Architecture
//!
//! - **Tenant-scoped listeners**: Every subscription carries a
//!   `SubscriptionScope` whose organization comes from the caller's session.
//!   Events for any other organization never reach the stream.
//! - **Optional task scope**: Comment and attachment subscriptions may narrow
//!   further to a single task.
//! - **Stream-owned teardown**: An `EventStream` owns its relay
//!   `Subscription`. Dropping the stream (client disconnect, server shutdown,
//!   explicit close) removes the listener exactly once.
//! - **Stale-listener pruning**: If a stream's receiver is gone before the
//!   stream is dropped, the next matching emission reports the listener as
//!   disconnected and the relay prunes it.
//! - **Ephemeral messages**: Events are never buffered for offline clients;
//!   a reconnecting client reloads fresh data.
//!
//! # Message Flow
//!
//! 1. Client opens an SSE endpoint with its bearer token
//! 2. Web layer resolves the token into a tenant
//! 3. `Subscriptions::open` registers a scoped listener on the relay
//! 4. A domain mutation commits and emits an event on the relay
//! 5. The listener's predicate checks tenant (and task) and enqueues the event
//! 6. The connection's stream yields it as an SSE frame named after the channel
//!
//! # Modules
//!
//! - `scope`: Tenant/task filter applied to every event
//! - `subscription`: Subscription registry facade and the per-connection `EventStream`
//! - `message`: Encoding relay events as SSE frames

pub mod message;
pub mod scope;
pub mod subscription;

pub use scope::SubscriptionScope;
pub use subscription::{EventStream, SubscriptionState, Subscriptions};
