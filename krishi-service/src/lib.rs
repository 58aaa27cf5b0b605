//! KrishiSahay: farming questions and crop photos answered by a chat model,
//! with canned agronomy advice when the model cannot be reached.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
