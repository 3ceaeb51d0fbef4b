use crate::dbc::core::syntax::{SyntaxNode, parse_number, rules};
use crate::dbc::types::{
    attributes::{AttrKind, AttrObject, AttrType},
    errors::SemanticError,
};

/// `BA_DEF_` declaration before its default value is known.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DeclaredDefinition {
    pub(crate) name: String,
    pub(crate) object_type: AttrObject,
    pub(crate) kind: AttrKind,
}

/// Decodes every attribute definition, in declaration order.
///
/// Expected formats:
/// BA_DEF_  "DBName" STRING;
/// BA_DEF_ BO_ "GenMsgCycleTime" INT 0 65535;
/// BA_DEF_ BU_ "NmhBaseAddress" HEX 0 536870911;
/// BA_DEF_ SG_ "GenSigStartValue" FLOAT 0 100000000000;
/// BA_DEF_ BO_ "GenMsgSendType" ENUM "Cyclic","NotUsed","IfActive";
pub(crate) fn decode_all(root: &SyntaxNode) -> Result<Vec<DeclaredDefinition>, SemanticError> {
    let Some(defs) = root.child(rules::ATTRIBUTE_DEFINITIONS) else {
        return Ok(Vec::new());
    };
    defs.children_of(rules::ATTRIBUTE_DEFINITION)
        .map(decode)
        .collect()
}

fn decode(def: &SyntaxNode) -> Result<DeclaredDefinition, SemanticError> {
    let name: String = def.require_text(rules::ATTRIBUTE_NAME)?.to_string();
    let object_type: AttrObject = AttrObject::from_token(def.child_text(rules::OBJECT_TYPE));

    let value_type: &SyntaxNode = def.require(rules::ATTRIBUTE_VALUE_TYPE)?;
    let keyword: &str = value_type.require_text(rules::KIND)?.trim();
    let attr_type: AttrType =
        keyword
            .parse::<AttrType>()
            .map_err(|kind| SemanticError::UnknownAttributeKind {
                attribute: name.clone(),
                kind,
            })?;

    let kind: AttrKind = match attr_type {
        AttrType::Int => {
            let (min, max) = bounds::<i64>(value_type, rules::INTEGER)?;
            AttrKind::Int { min, max }
        }
        AttrType::Hex => {
            let (min, max) = bounds::<i64>(value_type, rules::INTEGER)?;
            AttrKind::Hex { min, max }
        }
        AttrType::Float => {
            let (min, max) = bounds::<f64>(value_type, rules::FLOAT)?;
            AttrKind::Float { min, max }
        }
        AttrType::String => AttrKind::String,
        AttrType::Enum => AttrKind::Enum {
            values: value_type
                .children_of(rules::STRING)
                .map(|label| label.text().to_string())
                .collect(),
        },
    };

    Ok(DeclaredDefinition {
        name,
        object_type,
        kind,
    })
}

/// The `<min> <max>` pair following `INT`, `HEX` or `FLOAT`.
fn bounds<T: std::str::FromStr>(
    value_type: &SyntaxNode,
    rule: &'static str,
) -> Result<(T, T), SemanticError> {
    let mut numbers = value_type.children_of(rule);
    let mut next = || -> Result<T, SemanticError> {
        let node = numbers.next().ok_or_else(|| SemanticError::MissingNode {
            rule,
            parent: value_type.rule.clone(),
        })?;
        parse_number(rule, node.text())
    };
    let min: T = next()?;
    let max: T = next()?;
    Ok((min, max))
}
