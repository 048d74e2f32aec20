//! Core functionality: documents, editing helpers, auto-save, sharing and configuration

pub mod autosave;
pub mod config;
pub mod document;
pub mod editing;
pub mod share;
