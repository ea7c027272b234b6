//! Core key-resolution engine.
//!
//! ## Module Structure
//!
//! - `tree`: Translation trees, dotted keys and nested lookup
//! - `store`: Document store keeping label -> tree in sync with files
//! - `matcher`: Prefix recognition (`MatchSpec`)
//! - `resolver`: Span extraction, best-key disambiguation, hover, completion
//!   and definition resolution
//! - `error`: Document load errors

mod error;
pub mod matcher;
pub mod resolver;
pub mod store;
pub mod tree;

pub use error::DocumentError;
pub use matcher::*;
pub use resolver::*;
pub use store::*;
pub use tree::*;
