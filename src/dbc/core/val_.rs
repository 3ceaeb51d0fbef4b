use crate::dbc::core::syntax::{SyntaxNode, rules};
use crate::dbc::types::{
    errors::SemanticError,
    value_table::{ValueTableDBC, ValueTableItem},
};

/// Collects every `VAL_` table of the tree, in declaration order, items sorted by value.
///
/// Shape: `VAL_ <MessageID> <SignalName> <value> "<desc>" ... ;`
pub(crate) fn decode_all(root: &SyntaxNode) -> Result<Vec<ValueTableDBC>, SemanticError> {
    let Some(vals) = root.child(rules::VALS) else {
        return Ok(Vec::new());
    };
    vals.children_of(rules::VAL).map(decode).collect()
}

fn decode(val: &SyntaxNode) -> Result<ValueTableDBC, SemanticError> {
    let message_id: u32 = val.require_number(rules::ID)?;
    let name: &str = val.require_text(rules::NAME)?;

    let items: Vec<ValueTableItem> = val
        .children_of(rules::VAL_ITEM)
        .map(|item| {
            Ok(ValueTableItem {
                value: item.require_number(rules::INTEGER)?,
                label: item.require_text(rules::STRING)?.to_string(),
            })
        })
        .collect::<Result<_, SemanticError>>()?;

    let mut table = ValueTableDBC {
        message_id,
        name: name.to_string(),
        items,
    };
    table.sort_items();
    Ok(table)
}
