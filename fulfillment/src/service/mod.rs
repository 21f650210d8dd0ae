//! Order processing services

pub mod kitchen;

pub use kitchen::KitchenService;
