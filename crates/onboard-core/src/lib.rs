pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod model;
pub mod nav;
pub mod oauth;
pub mod poll;
pub mod report;
pub mod selection;
pub mod session;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;
