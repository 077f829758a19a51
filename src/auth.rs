//! Identity descriptors, persona aliases, and token secrets.

pub mod alias;
pub mod id;
pub mod identity;
pub mod secret;

pub use alias::*;
pub use id::*;
pub use identity::*;
pub use secret::*;
