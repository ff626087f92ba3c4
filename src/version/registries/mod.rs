//! Concrete registry implementations

pub mod npm;

pub use npm::NpmRegistry;
