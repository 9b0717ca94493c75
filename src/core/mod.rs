pub mod campaign;
pub mod engine;
