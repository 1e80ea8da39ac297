pub mod sync_controller;

pub use sync_controller::{PaneState, SyncController, SyncEffect};
