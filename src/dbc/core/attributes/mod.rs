//! Attribute pipeline: `BA_DEF_` → `BA_DEF_DEF_` → slot instantiation → `BA_`.

pub(crate) mod ba_;
pub(crate) mod ba_def_;
pub(crate) mod ba_def_def_;
pub(crate) mod slots;

use crate::dbc::core::syntax::{SyntaxNode, parse_number, rules};
use crate::dbc::types::{
    attributes::{AttrKind, AttrValue, AttributeDefinition},
    database::DatabaseDBC,
    errors::SemanticError,
};

/// Runs the four attribute steps, strictly in order, over an assembled database.
pub(crate) fn decode_all(db: &mut DatabaseDBC, root: &SyntaxNode) -> Result<(), SemanticError> {
    let declared = ba_def_::decode_all(root)?;
    let defaults = ba_def_def_::decode_all(root, &declared)?;

    for (decl, default) in declared.into_iter().zip(defaults) {
        let default: AttrValue = match default {
            Some(value) => value,
            None => zero_value(&decl.name, &decl.kind)?,
        };
        db.add_attribute_definition(AttributeDefinition {
            name: decl.name,
            object_type: decl.object_type,
            kind: decl.kind,
            default,
        });
    }

    let layout = slots::AttributeTableBuilder::from_definitions(db);
    layout.instantiate(db);
    ba_::decode_all(db, root, &layout)
}

/// Value used when a definition has no `BA_DEF_DEF_`.
fn zero_value(name: &str, kind: &AttrKind) -> Result<AttrValue, SemanticError> {
    Ok(match kind {
        AttrKind::Int { .. } => AttrValue::Int(0),
        AttrKind::Hex { .. } => AttrValue::Hex(0),
        AttrKind::Float { .. } => AttrValue::Float(0.0),
        AttrKind::String => AttrValue::Str(String::new()),
        AttrKind::Enum { values } => enum_label(name, values, 0)?,
    })
}

/// Parses the value carried by a default or assignment subtree according to `kind`.
///
/// INT and HEX read signed decimal text, FLOAT reads floating text, STRING reads the quoted text
/// (empty when absent) and ENUM reads an index into the label list; a literal label is accepted
/// too. `Ok(None)` means the subtree carries no usable value.
pub(crate) fn parse_value(
    name: &str,
    kind: &AttrKind,
    node: &SyntaxNode,
) -> Result<Option<AttrValue>, SemanticError> {
    let number: Option<&str> = node.child_text(rules::ATTRIBUTE_VALUE_NUMBER);
    let string: Option<&str> = node.child_text(rules::ATTRIBUTE_VALUE_STRING);

    if let AttrKind::String = kind {
        let text: &str = string.or(number).unwrap_or("");
        return Ok(Some(AttrValue::Str(text.to_string())));
    }

    let Some(raw) = number.or(string) else {
        return Ok(None);
    };
    let value: AttrValue = match kind {
        AttrKind::Int { .. } => AttrValue::Int(parse_integer(raw)?),
        AttrKind::Hex { .. } => AttrValue::Hex(parse_integer(raw)?),
        AttrKind::Float { .. } => AttrValue::Float(parse_number(rules::ATTRIBUTE_VALUE_NUMBER, raw)?),
        AttrKind::Enum { values } => match raw.trim().parse::<i64>() {
            Ok(index) => enum_label(name, values, index)?,
            Err(_) => match values.iter().find(|label| label.as_str() == raw) {
                Some(label) => AttrValue::Enum(label.clone()),
                None => {
                    let rule: &'static str = if number.is_some() {
                        rules::ATTRIBUTE_VALUE_NUMBER
                    } else {
                        rules::ATTRIBUTE_VALUE_STRING
                    };
                    return Err(SemanticError::InvalidNumber {
                        rule,
                        text: raw.to_string(),
                    });
                }
            },
        },
        AttrKind::String => AttrValue::Str(raw.to_string()),
    };
    Ok(Some(value))
}

/// Integer text; a float spelling such as `5.0` is truncated.
fn parse_integer(raw: &str) -> Result<i64, SemanticError> {
    if let Ok(value) = raw.trim().parse::<i64>() {
        return Ok(value);
    }
    let value: f64 = parse_number(rules::ATTRIBUTE_VALUE_NUMBER, raw)?;
    if !value.is_finite() {
        return Err(SemanticError::InvalidNumber {
            rule: rules::ATTRIBUTE_VALUE_NUMBER,
            text: raw.to_string(),
        });
    }
    Ok(value as i64)
}

/// Label at `index`; negative or past-the-end indices have no label.
fn enum_label(name: &str, values: &[String], index: i64) -> Result<AttrValue, SemanticError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| values.get(i))
        .map(|label| AttrValue::Enum(label.clone()))
        .ok_or_else(|| SemanticError::EnumIndexOutOfRange {
            attribute: name.to_string(),
            index,
            len: values.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> SyntaxNode {
        SyntaxNode::new(
            rules::ATTRIBUTE_DEFAULT,
            vec![SyntaxNode::leaf(rules::ATTRIBUTE_VALUE_NUMBER, text)],
        )
    }

    fn string(text: &str) -> SyntaxNode {
        SyntaxNode::new(
            rules::ATTRIBUTE_DEFAULT,
            vec![SyntaxNode::leaf(rules::ATTRIBUTE_VALUE_STRING, text)],
        )
    }

    fn send_type() -> AttrKind {
        AttrKind::Enum {
            values: vec!["Cyclic".into(), "OnChange".into(), "IfActive".into()],
        }
    }

    #[test]
    fn test_numeric_kinds() {
        let int = AttrKind::Int { min: 0, max: 100 };
        let hex = AttrKind::Hex { min: 0, max: 255 };
        let float = AttrKind::Float { min: 0.0, max: 1.0 };
        assert_eq!(parse_value("a", &int, &number("5")), Ok(Some(AttrValue::Int(5))));
        assert_eq!(parse_value("a", &int, &number("-7.0")), Ok(Some(AttrValue::Int(-7))));
        assert_eq!(parse_value("a", &hex, &number("255")), Ok(Some(AttrValue::Hex(255))));
        assert_eq!(
            parse_value("a", &float, &number("0.25")),
            Ok(Some(AttrValue::Float(0.25)))
        );
        assert!(matches!(
            parse_value("a", &int, &number("five")),
            Err(SemanticError::InvalidNumber { .. })
        ));
        let empty = SyntaxNode::new(rules::ATTRIBUTE_DEFAULT, Vec::new());
        assert_eq!(parse_value("a", &int, &empty), Ok(None));
    }

    #[test]
    fn test_string_kind_defaults_to_empty() {
        let empty = SyntaxNode::new(rules::ATTRIBUTE_DEFAULT, Vec::new());
        assert_eq!(
            parse_value("a", &AttrKind::String, &empty),
            Ok(Some(AttrValue::Str(String::new())))
        );
        assert_eq!(
            parse_value("a", &AttrKind::String, &string("Gateway")),
            Ok(Some(AttrValue::Str("Gateway".into())))
        );
    }

    #[test]
    fn test_enum_index_and_label() {
        assert_eq!(
            parse_value("SendType", &send_type(), &number("1")),
            Ok(Some(AttrValue::Enum("OnChange".into())))
        );
        assert_eq!(
            parse_value("SendType", &send_type(), &string("IfActive")),
            Ok(Some(AttrValue::Enum("IfActive".into())))
        );
        assert_eq!(
            parse_value("SendType", &send_type(), &number("3")),
            Err(SemanticError::EnumIndexOutOfRange {
                attribute: "SendType".into(),
                index: 3,
                len: 3
            })
        );
    }

    #[test]
    fn test_enum_value_without_label() {
        assert_eq!(
            parse_value("SendType", &send_type(), &number("-1")),
            Err(SemanticError::EnumIndexOutOfRange {
                attribute: "SendType".into(),
                index: -1,
                len: 3
            })
        );
        assert_eq!(
            parse_value("SendType", &send_type(), &number("Sporadic")),
            Err(SemanticError::InvalidNumber {
                rule: rules::ATTRIBUTE_VALUE_NUMBER,
                text: "Sporadic".into()
            })
        );
        assert_eq!(
            parse_value("SendType", &send_type(), &string("Sporadic")),
            Err(SemanticError::InvalidNumber {
                rule: rules::ATTRIBUTE_VALUE_STRING,
                text: "Sporadic".into()
            })
        );
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(zero_value("a", &send_type()), Ok(AttrValue::Enum("Cyclic".into())));
        assert_eq!(zero_value("a", &AttrKind::String), Ok(AttrValue::Str(String::new())));
        assert!(zero_value("a", &AttrKind::Enum { values: Vec::new() }).is_err());
    }
}
