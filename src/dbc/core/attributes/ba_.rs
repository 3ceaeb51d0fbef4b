use crate::dbc::core::attributes::{parse_value, slots::AttributeTableBuilder};
use crate::dbc::core::syntax::{SyntaxNode, rules};
use crate::dbc::types::{
    attributes::{AttrKind, AttrObject, AttrValue, AttributeKey, AttributeValue},
    database::DatabaseDBC,
    errors::SemanticError,
};

/// Applies `BA_` overrides to message and signal attribute slots.
///
/// Expected formats:
/// BA_ "GenMsgCycleTime" BO_ 100 50;
/// BA_ "GenSigStartValue" SG_ 100 Speed 12.5;
/// BA_ "GenMsgSendType" BO_ 100 1;
///
/// Node, network and environment-variable assignments are skipped, as are assignments naming an
/// undeclared attribute or a message/signal that does not exist.
pub(crate) fn decode_all(
    db: &mut DatabaseDBC,
    root: &SyntaxNode,
    layout: &AttributeTableBuilder,
) -> Result<(), SemanticError> {
    let Some(section) = root.child(rules::ATTRIBUTE_VALUES) else {
        return Ok(());
    };

    for node in section.children_of(rules::ATTRIBUTE_ASSIGNMENT) {
        let name: &str = node.require_text(rules::ATTRIBUTE_NAME)?;
        let scope: AttrObject = AttrObject::from_token(node.child_text(rules::OBJECT_TYPE));
        if matches!(scope, AttrObject::Node | AttrObject::Event) {
            continue;
        }

        let Some(pos) = layout.position(scope, name) else {
            tracing::debug!("{} attribute {} is not declared", scope, name);
            continue;
        };
        let Some(key) = layout.definition_at(scope, pos) else {
            continue;
        };

        let message_id: u32 = node.require_number(rules::ID)?;
        let signal_name: Option<&str> = match scope {
            AttrObject::Message => None,
            _ => Some(node.require_text(rules::NAME)?),
        };
        if !has_slot(db, message_id, signal_name, pos) {
            tracing::debug!(
                "attribute {} for unknown target {}:{} dropped",
                name,
                message_id,
                signal_name.unwrap_or("")
            );
            continue;
        }

        let Some(value) = value_for(db, key, node)? else {
            continue;
        };
        if let Some(slot) = slot_mut(db, message_id, signal_name, pos) {
            tracing::trace!("attribute {} = {}", name, value);
            slot.value = value;
        }
    }
    Ok(())
}

fn has_slot(db: &DatabaseDBC, message_id: u32, signal_name: Option<&str>, pos: usize) -> bool {
    let Some(msg) = db.get_message_by_id(message_id) else {
        return false;
    };
    let slots = match signal_name {
        None => &msg.attributes,
        Some(signal_name) => match msg.get_signal_by_name(signal_name) {
            Some(sig) => &sig.attributes,
            None => return false,
        },
    };
    pos < slots.len()
}

fn slot_mut<'a>(
    db: &'a mut DatabaseDBC,
    message_id: u32,
    signal_name: Option<&str>,
    pos: usize,
) -> Option<&'a mut AttributeValue> {
    let msg = db.get_message_by_id_mut(message_id)?;
    let slots = match signal_name {
        None => &mut msg.attributes,
        Some(signal_name) => &mut msg.get_signal_by_name_mut(signal_name)?.attributes,
    };
    slots.get_mut(pos)
}

/// Parses the assignment value with the definition behind `key`.
fn value_for(
    db: &DatabaseDBC,
    key: AttributeKey,
    node: &SyntaxNode,
) -> Result<Option<AttrValue>, SemanticError> {
    let Some(def) = db.attribute_definition(key) else {
        return Ok(None);
    };
    let kind: &AttrKind = &def.kind;
    parse_value(&def.name, kind, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::types::{
        attributes::AttributeDefinition, message::MessageDBC, signal::SignalDBC,
    };

    fn assignment(name: &str, object_type: &str, target: &[(&str, &str)], value: &str) -> SyntaxNode {
        let mut children = vec![
            SyntaxNode::leaf(rules::ATTRIBUTE_NAME, name),
            SyntaxNode::leaf(rules::OBJECT_TYPE, object_type),
        ];
        for (rule, text) in target {
            children.push(SyntaxNode::leaf(rule, text));
        }
        children.push(SyntaxNode::leaf(rules::ATTRIBUTE_VALUE_NUMBER, value));
        SyntaxNode::new(rules::ATTRIBUTE_ASSIGNMENT, children)
    }

    fn database() -> DatabaseDBC {
        let mut db = DatabaseDBC::default();
        for id in [100, 200] {
            db.push_message(MessageDBC {
                id,
                name: format!("M{id}"),
                signals: vec![SignalDBC {
                    name: "Speed".into(),
                    ..Default::default()
                }],
                ..Default::default()
            });
        }
        db.add_attribute_definition(AttributeDefinition {
            name: "CycleTime".into(),
            object_type: AttrObject::Message,
            kind: AttrKind::Int { min: 0, max: 1000 },
            default: AttrValue::Int(100),
        });
        db.add_attribute_definition(AttributeDefinition {
            name: "StartValue".into(),
            object_type: AttrObject::Signal,
            kind: AttrKind::Float { min: 0.0, max: 100.0 },
            default: AttrValue::Float(0.0),
        });
        db.add_attribute_definition(AttributeDefinition {
            name: "SendType".into(),
            object_type: AttrObject::Message,
            kind: AttrKind::Enum {
                values: vec!["Cyclic".into(), "OnChange".into()],
            },
            default: AttrValue::Enum("Cyclic".into()),
        });
        db
    }

    fn values(assignments: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(
            rules::ROOT,
            vec![SyntaxNode::new(rules::ATTRIBUTE_VALUES, assignments)],
        )
    }

    #[test]
    fn test_overrides_touch_only_their_target() {
        let mut db = database();
        let layout = AttributeTableBuilder::from_definitions(&db);
        layout.instantiate(&mut db);

        let root = SyntaxNode::new(
            rules::ROOT,
            vec![SyntaxNode::new(
                rules::ATTRIBUTE_VALUES,
                vec![
                    assignment("CycleTime", "BO_", &[(rules::ID, "100")], "50"),
                    assignment(
                        "StartValue",
                        "SG_",
                        &[(rules::ID, "200"), (rules::NAME, "Speed")],
                        "12.5",
                    ),
                    assignment("CycleTime", "BO_", &[(rules::ID, "999")], "1"),
                    assignment("Unknown", "BO_", &[(rules::ID, "100")], "1"),
                    assignment("CycleTime", "BU_", &[(rules::NODE, "Motor")], "1"),
                ],
            )],
        );
        decode_all(&mut db, &root, &layout).unwrap();

        let m100 = db.get_message_by_id(100).unwrap();
        let m200 = db.get_message_by_id(200).unwrap();
        assert_eq!(db.attribute_value(&m100.attributes, "CycleTime"), Some(&AttrValue::Int(50)));
        assert_eq!(db.attribute_value(&m200.attributes, "CycleTime"), Some(&AttrValue::Int(100)));
        assert_eq!(
            db.attribute_value(&m100.signals[0].attributes, "StartValue"),
            Some(&AttrValue::Float(0.0))
        );
        assert_eq!(
            db.attribute_value(&m200.signals[0].attributes, "StartValue"),
            Some(&AttrValue::Float(12.5))
        );
    }

    #[test]
    fn test_values_for_missing_targets_are_not_parsed() {
        let mut db = database();
        let layout = AttributeTableBuilder::from_definitions(&db);
        layout.instantiate(&mut db);

        let root = values(vec![
            assignment("SendType", "BO_", &[(rules::ID, "999")], "7"),
            assignment(
                "StartValue",
                "SG_",
                &[(rules::ID, "100"), (rules::NAME, "Missing")],
                "oops",
            ),
            assignment("SendType", "BO_", &[(rules::ID, "200")], "1"),
        ]);
        decode_all(&mut db, &root, &layout).unwrap();

        let m200 = db.get_message_by_id(200).unwrap();
        assert_eq!(
            db.attribute_value(&m200.attributes, "SendType"),
            Some(&AttrValue::Enum("OnChange".into()))
        );
    }

    #[test]
    fn test_bad_value_on_existing_target_is_fatal() {
        let mut db = database();
        let layout = AttributeTableBuilder::from_definitions(&db);
        layout.instantiate(&mut db);

        let root = values(vec![assignment("SendType", "BO_", &[(rules::ID, "100")], "7")]);
        assert_eq!(
            decode_all(&mut db, &root, &layout),
            Err(SemanticError::EnumIndexOutOfRange {
                attribute: "SendType".into(),
                index: 7,
                len: 2
            })
        );
    }
}
