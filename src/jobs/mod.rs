//! Client-side tracking of server background work.
//!
//! The backend offers no push channel for long-running work. File parsing
//! is observed by polling the file list ([`file_parse`]); AI template
//! generation is a single long request guarded against double submission
//! ([`template_create`]).

pub mod file_parse;
pub mod template_create;

pub use file_parse::{FileListSource, FileParsePoller, JobSource, PollPhase, PollSnapshot};
pub use template_create::{TemplateCreateParams, TemplateCreateTask};
