//! Client-side realtime sync core for the DevLink developer network.
//!
//! The crate keeps an in-memory view of conversations, messages, and
//! notifications consistent across three inputs: REST snapshot fetches
//! (authoritative, applied as wholesale overwrites), push-delivered deltas
//! (incremental appends), and locally-originated optimistic writes. It owns
//! no UI and no persistence; the REST backend and the push connection are
//! collaborators reached through the [`api::ResourceClient`] and
//! [`channel::EventChannel`] traits.

pub mod api;
pub mod channel;
pub mod config;
pub mod errors;
pub mod models;
pub mod service;
pub mod session;

pub use api::{HttpResourceClient, ResourceClient};
pub use channel::{EventChannel, PushChannel, PushEvent};
pub use config::ApiConfig;
pub use errors::SyncError;
pub use service::{PaneState, SyncController, SyncEffect};
pub use session::Session;
