pub mod bank;
pub mod generator;
pub mod sessions;
