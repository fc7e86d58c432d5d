pub mod sentences;
pub mod sessions;
