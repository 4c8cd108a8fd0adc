pub mod analysis;
pub mod scenarios;
pub mod sensitivity;
