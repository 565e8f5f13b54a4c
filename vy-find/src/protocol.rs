//! Protocol used to drive sessions.
//!
//! Requests describe what the host does (user commands, cursor moves, selections); responses describe what happened,
//! in a form suitable for a status line.

pub mod request;
pub mod response;
