//! Layered, language-localized configuration.
//!
//! A [`Config`] resolves dotted key paths across any number of named
//! sources, each backed by a bundled per-language default document (YAML or
//! JSON) and a user-editable file on disk. Lookups go through three tiers,
//! highest first: process-local runtime overrides, the user files, and the
//! bundled defaults. First-run startup materializes the bundled defaults to
//! disk so users have something to edit.

pub mod config;
pub mod language;
pub mod mapping;

pub use config::{Config, ConfigError, Provider, Source, Value};
pub use language::Language;
pub use mapping::Mapper;
