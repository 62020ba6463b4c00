//! Client-side stores.
//!
//! DESIGN
//! ======
//! Each store is a plain struct owned by its caller. Fetch actions borrow an
//! [`crate::ApiClient`], write the response into fields, and return the
//! error for the caller to act on; the HTTP wrapper has already notified
//! the user. Stores that survive restarts write a small subset of their
//! fields to a [`crate::storage::KeyValueStore`] on every change and read it
//! back in `load`.

pub mod model_config;
pub mod prompt_config;
pub mod router;
pub mod system;
pub mod user;

pub use model_config::{ModelConfigStore, Pagination};
pub use prompt_config::PromptConfigStore;
pub use router::{MenuItem, RouterStore};
pub use system::SystemStore;
pub use user::UserStore;
