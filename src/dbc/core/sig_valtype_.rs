use std::collections::HashMap;

use crate::dbc::core::syntax::{SyntaxNode, rules};
use crate::dbc::types::{errors::SemanticError, signal::FloatFormat};

/// `SIG_VALTYPE_` records of a tree, indexed by `(message id, signal name)`.
///
/// Shape: `SIG_VALTYPE_ <MsgID> <SignalName> : <Value>;`
/// where `<Value>` is `1` (IEEE float, 32-bit) or `2` (IEEE double, 64-bit).
#[derive(Default, Debug)]
pub(crate) struct FloatIndex<'a> {
    codes: HashMap<(u32, &'a str), u32>,
    declared: bool,
}

impl<'a> FloatIndex<'a> {
    /// Scans the tree once; the first record for a given key wins.
    pub(crate) fn build(root: &'a SyntaxNode) -> Result<Self, SemanticError> {
        let mut index = FloatIndex::default();
        for sigval in root.children_of(rules::SIGVAL) {
            index.declared = true;
            let id: u32 = sigval.require_number(rules::ID)?;
            let name: &str = sigval.require_text(rules::NAME)?;
            let code: u32 = sigval.require_number(rules::SIGTYPE)?;
            index.codes.entry((id, name)).or_insert(code);
        }
        Ok(index)
    }

    pub(crate) fn format_of(&self, message_id: u32, signal_name: &str) -> FloatFormat {
        match self.codes.get(&(message_id, signal_name)) {
            Some(&code) => {
                tracing::debug!("floating -> {}:{}:{}", signal_name, message_id, code);
                FloatFormat::from_code(code)
            }
            None => FloatFormat::NotFloating,
        }
    }

    /// True if the tree carries at least one `SIG_VALTYPE_` record.
    pub(crate) fn is_declared(&self) -> bool {
        self.declared
    }
}
