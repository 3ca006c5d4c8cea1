//! Core traits for the backdrop watcher
//!
//! - [`ImageSource`]: Fetch the currently published image URL
//! - [`Notifier`]: Announce a new image URL
//! - [`StateStore`]: Persist the last-seen image URL

pub mod image_source;
pub mod notifier;
pub mod state_store;

pub use image_source::ImageSource;
pub use notifier::Notifier;
pub use state_store::{StateRecord, StateStore};
