//! Intake domain types
//!
//! Everything here is plain data: the session controller in the agent crate
//! owns the only mutable instance per visitor.

mod assessment;
mod conversation;
mod records;

pub use assessment::*;
pub use conversation::*;
pub use records::*;
