//! # dbc
//!
//! `dbc` is the module to work with DBC syntax trees and the database built from them.
//!
//! - [`assemble`] turns a parsed tree into a [`DatabaseDBC`](types::database::DatabaseDBC).
//! - [`from_file`] / [`from_str`] read DBC text through the bundled line-oriented front-end
//!   (feature `reader`).
//! - [`records`] renders a database into the reference record layout.

pub(crate) mod assemble;
pub(crate) mod core;
#[cfg(feature = "reader")]
pub(crate) mod parse;
pub mod records;
pub mod types;

pub use self::assemble::assemble;
pub use self::core::syntax::{SyntaxNode, rules};
#[cfg(feature = "reader")]
pub use self::parse::{from_file, from_str, tree_from_str};
