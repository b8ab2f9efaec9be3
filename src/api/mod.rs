//! Lambda handlers and request processing

pub mod extract_handler;
pub mod helpers;
pub mod parsing;
pub mod reminder_handler;
