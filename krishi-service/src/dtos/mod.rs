pub mod advisory;

pub use advisory::{ImageAnalysisResponse, Question, ResponseSource, TextResponse};
