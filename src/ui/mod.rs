//! UI components for Codeshare

pub mod editor;
pub mod home;
pub mod open_dialog;
