//! auto-translate - automatic record translation
//!
//! Fills every missing `(field, locale)` translation of a record from its
//! source-locale text using DeepL, without ever overwriting an existing entry.

pub mod cli;
pub mod config;
pub mod error;
pub mod filler;
pub mod locale;
pub mod observer;
pub mod queue;
pub mod record;
pub mod service;
pub mod slug;
pub mod store;
pub mod translate;
