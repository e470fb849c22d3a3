//! Safe SQL for the entity table: table name validated once, values always bound.

mod builder;
pub use builder::*;
