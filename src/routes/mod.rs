//! HTTP surface used when the action runs behind an OpenWhisk-style proxy.

pub mod action;
pub mod common;

pub use action::action_routes;
pub use common::common_routes;
