use std::io;
use thiserror::Error;

/// Errors produced while turning a DBC syntax tree into a [`DatabaseDBC`](crate::DatabaseDBC).
///
/// Every variant is fatal for the whole assembly: no partially built database is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SemanticError {
    #[error("No syntax tree available: the DBC text could not be parsed")]
    StructuralParseFailure,
    #[error("No messages found in the DBC syntax tree")]
    EmptyDatabase,
    #[error(
        "Multiple multiplexor signals detected in message '{message}' (id {id}): '{first}' and '{second}'"
    )]
    MultipleMultiplexors {
        message: String,
        id: u32,
        first: String,
        second: String,
    },
    #[error("Signal '{signal}': {field} = {value} is out of range (allowed {min}..={max})")]
    FieldOutOfRange {
        signal: String,
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("Attribute '{attribute}' declares an unknown value type '{kind}'")]
    UnknownAttributeKind { attribute: String, kind: String },
    #[error("Attribute '{attribute}': enum index {index} has no label (only {len} labels defined)")]
    EnumIndexOutOfRange {
        attribute: String,
        index: i64,
        len: usize,
    },
    #[error("Mandatory syntax node '{rule}' missing under '{parent}'")]
    MissingNode { rule: &'static str, parent: String },
    #[error("Syntax node '{rule}' holds '{text}', which is not a valid number")]
    InvalidNumber { rule: &'static str, text: String },
}

/// Errors produced while reading a `.dbc` file through the text front-end.
#[derive(Debug, Error)]
pub enum DbcParseError {
    #[error("Not a valid .dbc file: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}
