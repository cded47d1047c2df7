pub mod admission;
pub mod error;
pub mod listings;
pub mod roster;
pub mod session_guard;
pub mod store;
pub mod targeting;
