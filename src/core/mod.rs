//! Transport independent business logic.

pub mod greeting;
