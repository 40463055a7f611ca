pub mod models;
pub mod payloads;
