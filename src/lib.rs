//! # solution-client
//!
//! Headless client for the solution-writing assistant API. Owns everything
//! below the UI layer: the authenticated HTTP wrapper, one request module per
//! backend resource, session and store state with durable persistence, the
//! route guard, the editor AI config mapping, and the background-job poller
//! that tracks server-side file parsing.
//!
//! DESIGN
//! ======
//! Data flows one way: caller action -> `api` module -> `net::http` wrapper
//! -> store mutation -> observable state. The file-parse poller in `jobs` is
//! the only component that owns a timer.

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod guard;
pub mod jobs;
pub mod net;
pub mod session;
pub mod state;
pub mod storage;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
