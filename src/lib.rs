//! Transkey - translation key lookups for dotted references in source code
//!
//! Transkey resolves references such as `this._translate.CONTROLL.buy` against
//! a set of JSON translation files, one per language. It answers the three
//! questions an editor asks about such a reference: what the key says in each
//! language (hover), which child keys follow a trailing `.` (completion), and
//! where the key is written in each file (definition).
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Translation trees, the document store, and the key resolver
//! - `mcp`: Model Context Protocol server implementation
//! - `workspace`: A project root bound to its configuration and documents

pub mod cli;
pub mod config;
pub mod core;
pub mod mcp;
pub mod workspace;
