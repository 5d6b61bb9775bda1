pub mod client;
pub mod delay;
pub mod store;

pub use client::HttpWorkflowApi;
pub use delay::TokioDelay;
pub use store::KeyringStore;
