//! Storage infrastructure: configuration and template persistence.
//!
//! - `config` reads and writes the TOML application config, falling back to
//!   defaults when the file does not exist yet (first run).
//! - `template_store` keeps one pretty-printed JSON record per template in
//!   a single directory and implements
//!   [`TemplateRepository`](crate::application::TemplateRepository).

pub mod config;
pub mod template_store;
