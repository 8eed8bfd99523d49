//! API route modules.

pub mod index;
pub mod share;
pub mod summarize;
