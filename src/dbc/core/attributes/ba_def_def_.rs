use std::collections::HashMap;

use crate::dbc::core::attributes::{ba_def_::DeclaredDefinition, parse_value};
use crate::dbc::core::syntax::{SyntaxNode, rules};
use crate::dbc::types::{attributes::AttrValue, errors::SemanticError};

/// Resolves `BA_DEF_DEF_` records against the declared definitions.
///
/// Expected formats:
/// BA_DEF_DEF_  "GenMsgCycleTime" 0;
/// BA_DEF_DEF_  "GenMsgSendType" "Cyclic";
///
/// Returns one entry per definition, `None` when no default was declared for it. A default names
/// its definition only, so it applies to the first definition with that name whatever its object
/// type. Defaults for undeclared attributes are ignored; a later default replaces an earlier one.
pub(crate) fn decode_all(
    root: &SyntaxNode,
    declared: &[DeclaredDefinition],
) -> Result<Vec<Option<AttrValue>>, SemanticError> {
    let mut defaults: Vec<Option<AttrValue>> = vec![None; declared.len()];
    let Some(section) = root.child(rules::ATTRIBUTE_DEFAULTS) else {
        return Ok(defaults);
    };

    let mut by_name: HashMap<&str, usize> = HashMap::new();
    for (idx, decl) in declared.iter().enumerate() {
        by_name.entry(decl.name.as_str()).or_insert(idx);
    }

    for node in section.children_of(rules::ATTRIBUTE_DEFAULT) {
        let name: &str = node.require_text(rules::ATTRIBUTE_NAME)?;
        let Some(&idx) = by_name.get(name) else {
            tracing::debug!("default for undeclared attribute {} ignored", name);
            continue;
        };
        let decl: &DeclaredDefinition = &declared[idx];
        if let Some(value) = parse_value(&decl.name, &decl.kind, node)? {
            tracing::trace!("default {} = {}", name, value);
            defaults[idx] = Some(value);
        }
    }
    Ok(defaults)
}
