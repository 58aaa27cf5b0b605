pub mod advisory;
pub mod app;
pub mod image;

pub use advisory::ask;
pub use app::{health_check, index, not_found};
pub use image::analyze_image;
