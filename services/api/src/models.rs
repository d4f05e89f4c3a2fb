//! Records exchanged between repositories and handlers

pub mod content;
pub mod identity;
pub mod user;
