pub mod advisor;
pub mod fallback;
pub mod gateway;
pub mod providers;

pub use advisor::Advisor;
pub use gateway::{Completion, LlmGateway};
