//! # dbc_model
//!
//! Semantic layer for **CAN databases** (`.dbc`): turns a DBC syntax tree into a resolved,
//! strongly typed model.
//!
//! ## Highlights
//! - **Assembler**: [`assemble`] builds a [`DatabaseDBC`] from a [`SyntaxNode`] tree in one
//!   pass: value tables, messages and signals, attributes, comments.
//! - **Ordered model**: messages keep declaration order, signals are sorted by start bit and
//!   value tables by raw value.
//! - **Stable keys**: value tables and attribute definitions live in SlotMaps; signals and
//!   attribute slots hold [`ValueTableKey`] / [`AttributeKey`].
//! - **Attributes**: every message and signal carries one slot per definition of its scope,
//!   seeded with the default and overridden by `BA_`.
//! - **Text front-end** (feature `reader`): [`dbc::from_file`] / [`dbc::from_str`].
//! - **Records**: [`dbc::records`] renders the reference `Name`/`Start`/`Length`/... layout.
//!
//! ## Example
//! ```
//! # #[cfg(feature = "reader")]
//! # {
//! let db = dbc_model::dbc::from_str(
//!     r#"
//! BO_ 100 Engine: 8 Motor
//!  SG_ Speed : 0|16@1+ (0.1,0) [0|6553.5] "km/h" ECU1
//! "#,
//! )
//! .unwrap();
//! let speed = db.get_signal(100, "Speed").unwrap();
//! assert_eq!(speed.unit, "km/h");
//! # }
//! ```

pub mod dbc;

// Top-level re-exports (appear under Crate Items → Structs)
#[doc(inline)]
pub use crate::dbc::types::{
    attributes::{
        AttrKind, AttrObject, AttrType, AttrValue, AttributeDefinition, AttributeKey,
        AttributeValue,
    },
    database::DatabaseDBC,
    errors::{DbcParseError, SemanticError},
    message::MessageDBC,
    signal::{Endianness, FloatFormat, MuxRole, NO_UNIT, SignalDBC, Signess},
    value_table::{ValueTableDBC, ValueTableItem, ValueTableKey},
};

pub use crate::dbc::{SyntaxNode, assemble, rules};
