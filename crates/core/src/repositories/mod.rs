//! Storage ports and their file-backed adapters.
//!
//! - [`requirements`]: read-only access to department requirements
//! - [`slots`]: persistence of committed schedule slots

pub mod requirements;
pub mod slots;

pub(crate) mod shared;
