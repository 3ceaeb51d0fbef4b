//! Query facade over the generic DBC syntax tree.
//!
//! The tree is produced by a grammar front-end (see [`crate::dbc::parse`] for the bundled,
//! line-oriented one). Every node carries a dotted rule path (`"name.ident"`), the raw text of
//! the matched token and its children. Builders only ever address children by rule path, never
//! by position, because DBC sections are optional and reorderable.

use crate::dbc::types::errors::SemanticError;

/// One node of the DBC syntax tree.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct SyntaxNode {
    /// Dotted rule path, e.g. `"id.integer"`.
    pub rule: String,
    /// Contiguous text of the node (leaf tokens only; empty for inner nodes).
    pub text: String,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Inner node with the given children.
    pub fn new(rule: &str, children: Vec<SyntaxNode>) -> Self {
        SyntaxNode {
            rule: rule.to_string(),
            text: String::new(),
            children,
        }
    }

    /// Leaf node carrying `text`.
    pub fn leaf(rule: &str, text: &str) -> Self {
        SyntaxNode {
            rule: rule.to_string(),
            text: text.to_string(),
            children: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// First direct child matching `rule`.
    pub fn child(&self, rule: &str) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.rule == rule)
    }

    /// First direct child matching `rule` at position `index` or later, with its position.
    pub fn child_after(&self, rule: &str, index: usize) -> Option<(usize, &SyntaxNode)> {
        self.children
            .iter()
            .enumerate()
            .skip(index)
            .find(|(_, c)| c.rule == rule)
    }

    /// Every direct child matching `rule`, in order.
    pub fn children_of<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a SyntaxNode> + 'a {
        let mut next: usize = 0;
        std::iter::from_fn(move || {
            let (idx, node) = self.child_after(rule, next)?;
            next = idx + 1;
            Some(node)
        })
    }

    /// Mandatory child: the grammar guarantees it, so absence is an internal-consistency error.
    pub fn require(&self, rule: &'static str) -> Result<&SyntaxNode, SemanticError> {
        self.child(rule).ok_or_else(|| SemanticError::MissingNode {
            rule,
            parent: self.rule.clone(),
        })
    }

    /// Text of the optional child `rule`.
    pub fn child_text(&self, rule: &str) -> Option<&str> {
        self.child(rule).map(SyntaxNode::text)
    }

    /// Text of the mandatory child `rule`.
    pub fn require_text(&self, rule: &'static str) -> Result<&str, SemanticError> {
        self.require(rule).map(SyntaxNode::text)
    }

    /// Parses the mandatory child `rule` as a number.
    pub fn require_number<T: std::str::FromStr>(
        &self,
        rule: &'static str,
    ) -> Result<T, SemanticError> {
        parse_number(rule, self.require_text(rule)?)
    }

    /// Parses the optional child `rule` as a number; a present but malformed value is an error.
    pub fn child_number<T: std::str::FromStr>(
        &self,
        rule: &'static str,
    ) -> Result<Option<T>, SemanticError> {
        self.child_text(rule)
            .map(|text| parse_number(rule, text))
            .transpose()
    }
}

pub(crate) fn parse_number<T: std::str::FromStr>(
    rule: &'static str,
    text: &str,
) -> Result<T, SemanticError> {
    text.trim()
        .parse::<T>()
        .map_err(|_| SemanticError::InvalidNumber {
            rule,
            text: text.to_string(),
        })
}

/// Rule paths of the DBC syntax tree.
pub mod rules {
    pub const ROOT: &str = "dbc";

    // sections
    pub const VALS: &str = "vals";
    pub const VAL: &str = "val";
    pub const VAL_ITEM: &str = "val_item";
    pub const MESSAGES: &str = "messages";
    pub const MESSAGE: &str = "message";
    pub const SIGNAL: &str = "signal";
    pub const SIGVAL: &str = "sigval";
    pub const COMMENTS: &str = "comments";
    pub const COMMENT: &str = "comment";
    pub const ATTRIBUTE_DEFINITIONS: &str = "attribute_definitions";
    pub const ATTRIBUTE_DEFINITION: &str = "attribute_definition";
    pub const ATTRIBUTE_DEFAULTS: &str = "attribute_defaults";
    pub const ATTRIBUTE_DEFAULT: &str = "attribute_default";
    pub const ATTRIBUTE_VALUES: &str = "attribute_values";
    pub const ATTRIBUTE_ASSIGNMENT: &str = "attribute_assignment";

    // leaves and small productions
    pub const ID: &str = "id.integer";
    pub const NAME: &str = "name.ident";
    pub const DLC: &str = "dlc.integer";
    pub const ECU: &str = "ecu.ident";
    pub const STARTBIT: &str = "startbit.integer";
    pub const LENGTH: &str = "length";
    pub const ENDIANESS: &str = "endianess.char";
    pub const SIGN: &str = "sign.char";
    pub const Y_MX_C: &str = "y_mx_c";
    pub const RANGE: &str = "range";
    pub const FLOAT: &str = "float";
    pub const INTEGER: &str = "integer";
    pub const STRING: &str = "string";
    pub const UNIT: &str = "unit.string";
    pub const NODES: &str = "nodes";
    pub const NODE: &str = "node.ident";
    pub const SINGLE_NODE: &str = "nodes.node.ident";
    pub const MUX_SWITCH: &str = "multiplexor.switch";
    pub const MUX_VALUE: &str = "multiplexor.value";
    pub const SIGTYPE: &str = "sigtype.integer";
    pub const OBJECT_TYPE: &str = "object_type";
    pub const COMMENT_STRING: &str = "comment_string.string";
    pub const ATTRIBUTE_NAME: &str = "attribute_name.string";
    pub const ATTRIBUTE_VALUE_TYPE: &str = "attribute_value_type";
    pub const KIND: &str = "kind";
    pub const ATTRIBUTE_VALUE_NUMBER: &str = "attribute_value.float";
    pub const ATTRIBUTE_VALUE_STRING: &str = "attribute_value.string";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxNode {
        SyntaxNode::new(
            "val",
            vec![
                SyntaxNode::leaf(rules::ID, "100"),
                SyntaxNode::leaf(rules::NAME, "Mode"),
                SyntaxNode::new(rules::VAL_ITEM, vec![SyntaxNode::leaf(rules::INTEGER, "1")]),
                SyntaxNode::leaf("noise", ""),
                SyntaxNode::new(rules::VAL_ITEM, vec![SyntaxNode::leaf(rules::INTEGER, "0")]),
            ],
        )
    }

    #[test]
    fn test_child_queries() {
        let node = sample();
        assert_eq!(node.child_text(rules::NAME), Some("Mode"));
        assert!(node.child(rules::UNIT).is_none());
        assert_eq!(node.child_after(rules::VAL_ITEM, 0).map(|(i, _)| i), Some(2));
        assert_eq!(node.child_after(rules::VAL_ITEM, 3).map(|(i, _)| i), Some(4));
        assert!(node.child_after(rules::VAL_ITEM, 5).is_none());
        assert_eq!(node.children_of(rules::VAL_ITEM).count(), 2);
    }

    #[test]
    fn test_require_and_numbers() {
        let node = sample();
        assert_eq!(node.require_number::<u32>(rules::ID), Ok(100));
        assert_eq!(
            node.require(rules::DLC),
            Err(SemanticError::MissingNode {
                rule: rules::DLC,
                parent: "val".into()
            })
        );
        assert_eq!(
            node.require_number::<u32>(rules::NAME),
            Err(SemanticError::InvalidNumber {
                rule: rules::NAME,
                text: "Mode".into()
            })
        );
        assert_eq!(node.child_number::<u32>(rules::DLC), Ok(None));
    }
}
