//! Find/replace sessions for text views.
//!
//! A [`search::SearchSession`] drives an incremental find/replace over anything implementing [`text::TextModel`].
//! Sessions are kept per view by [`views::ViewSessions`] and driven through JSON requests by [`handler::Handler`].

pub mod error;
pub mod handler;
pub mod input;
pub mod logging;
pub mod protocol;
pub mod search;
pub mod text;
pub mod views;
