//! Flutter bridge for the planboard core.

pub mod api;
