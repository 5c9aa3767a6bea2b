pub mod client;
pub mod validate;

pub use client::{PracticumClient, StatusSource};
pub use validate::validate;
