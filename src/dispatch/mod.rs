// src/dispatch/mod.rs
pub mod dispatcher;
pub mod splitter;

pub use dispatcher::{DispatchError, DispatchResult, Dispatcher};
pub use splitter::{split, CommandGroups, DEFAULT_DELIMITER};
