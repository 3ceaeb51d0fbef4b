//! Per-keyword decoders over the DBC syntax tree.
//!
//! One file per DBC construct, named after its keyword. Each decoder reads its own subtree
//! through the [`syntax`] facade and returns typed model parts or a [`SemanticError`].
//!
//! [`SemanticError`]: crate::dbc::types::errors::SemanticError

pub(crate) mod attributes;
pub(crate) mod bo_;
pub(crate) mod cm_;
pub(crate) mod sg_;
pub(crate) mod sig_valtype_;
#[cfg(feature = "reader")]
pub(crate) mod strings;
pub mod syntax;
pub(crate) mod val_;
