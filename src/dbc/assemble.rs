use crate::dbc::core::{
    attributes,
    bo_::{self, TableIndex},
    cm_,
    sig_valtype_::FloatIndex,
    syntax::{SyntaxNode, rules},
    val_,
};
use crate::dbc::types::{database::DatabaseDBC, errors::SemanticError, message::MessageDBC};

/// Builds a [`DatabaseDBC`] from the syntax tree of one DBC file.
///
/// `None` stands for a tree the grammar front-end failed to produce and yields
/// [`SemanticError::StructuralParseFailure`].
///
/// Steps, strictly in this order:
/// 1. value tables (`VAL_`), items sorted by value
/// 2. messages and their signals, linked to value tables and `SIG_VALTYPE_` formats
/// 3. rejection of a database without messages
/// 4. attribute definitions, defaults, per-object slots and overrides
/// 5. comments
///
/// Any fatal error aborts the run; no partial database is returned.
///
/// # Example
/// ```
/// use dbc_model::{SyntaxNode, assemble, rules};
///
/// let tree = SyntaxNode::new(rules::ROOT, Vec::new());
/// assert!(assemble(Some(&tree)).is_err());
/// assert!(assemble(None).is_err());
/// ```
pub fn assemble(tree: Option<&SyntaxNode>) -> Result<DatabaseDBC, SemanticError> {
    let Some(root) = tree else {
        tracing::warn!("no syntax tree to assemble");
        return Err(SemanticError::StructuralParseFailure);
    };

    let mut db = DatabaseDBC::default();

    // 1) VAL_
    for table in val_::decode_all(root)? {
        db.add_value_table(table);
    }

    // 2) BO_ / SG_ / SIG_VALTYPE_
    let floats = FloatIndex::build(root)?;
    db.use_float = floats.is_declared();
    let messages: Vec<MessageDBC> = decode_messages(&db, root, &floats)?;

    // 3) no messages, no database
    if messages.is_empty() {
        tracing::warn!("DBC declares no messages");
        return Err(SemanticError::EmptyDatabase);
    }
    for msg in messages {
        db.push_message(msg);
    }

    // 4) BA_DEF_ / BA_DEF_DEF_ / BA_
    attributes::decode_all(&mut db, root)?;

    // 5) CM_
    cm_::decode_all(&mut db, root)?;

    tracing::debug!(
        "assembled {} messages, {} value tables, {} attribute definitions",
        db.messages.len(),
        db.value_tables.len(),
        db.attribute_definitions.len()
    );
    Ok(db)
}

fn decode_messages(
    db: &DatabaseDBC,
    root: &SyntaxNode,
    floats: &FloatIndex<'_>,
) -> Result<Vec<MessageDBC>, SemanticError> {
    let Some(section) = root.child(rules::MESSAGES) else {
        return Ok(Vec::new());
    };

    let mut tables = TableIndex::new();
    for &key in &db.value_tables_order {
        if let Some(table) = db.value_tables.get(key) {
            tables
                .entry((table.message_id, table.name.as_str()))
                .or_insert(key);
        }
    }

    section
        .children_of(rules::MESSAGE)
        .map(|bo| bo_::decode(bo, floats, &tables))
        .collect()
}

impl DatabaseDBC {
    /// Same as [`assemble`] for a tree that is known to exist.
    pub fn from_syntax(root: &SyntaxNode) -> Result<DatabaseDBC, SemanticError> {
        assemble(Some(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::types::attributes::AttrValue;

    fn pair(rule: &str, a: &str, b: &str) -> SyntaxNode {
        SyntaxNode::new(
            rule,
            vec![SyntaxNode::leaf(rules::FLOAT, a), SyntaxNode::leaf(rules::FLOAT, b)],
        )
    }

    fn signal(name: &str, start: &str) -> SyntaxNode {
        SyntaxNode::new(
            rules::SIGNAL,
            vec![
                SyntaxNode::leaf(rules::NAME, name),
                SyntaxNode::leaf(rules::STARTBIT, start),
                SyntaxNode::leaf(rules::LENGTH, "8"),
                SyntaxNode::leaf(rules::ENDIANESS, "1"),
                SyntaxNode::leaf(rules::SIGN, "+"),
                pair(rules::Y_MX_C, "1", "0"),
                pair(rules::RANGE, "0", "255"),
                SyntaxNode::leaf(rules::UNIT, ""),
                SyntaxNode::leaf(rules::SINGLE_NODE, "Vector__XXX"),
            ],
        )
    }

    fn message(id: &str, name: &str, signals: Vec<SyntaxNode>) -> SyntaxNode {
        let mut children = vec![
            SyntaxNode::leaf(rules::ID, id),
            SyntaxNode::leaf(rules::NAME, name),
            SyntaxNode::leaf(rules::DLC, "8"),
            SyntaxNode::leaf(rules::ECU, "Motor"),
        ];
        children.extend(signals);
        SyntaxNode::new(rules::MESSAGE, children)
    }

    fn sigval(id: &str, name: &str, code: &str) -> SyntaxNode {
        SyntaxNode::new(
            rules::SIGVAL,
            vec![
                SyntaxNode::leaf(rules::ID, id),
                SyntaxNode::leaf(rules::NAME, name),
                SyntaxNode::leaf(rules::SIGTYPE, code),
            ],
        )
    }

    #[test]
    fn test_absent_tree_and_empty_database() {
        assert_eq!(assemble(None).unwrap_err(), SemanticError::StructuralParseFailure);

        let no_section = SyntaxNode::new(rules::ROOT, Vec::new());
        assert_eq!(assemble(Some(&no_section)).unwrap_err(), SemanticError::EmptyDatabase);

        let empty_section = SyntaxNode::new(
            rules::ROOT,
            vec![SyntaxNode::new(rules::MESSAGES, Vec::new())],
        );
        assert_eq!(
            DatabaseDBC::from_syntax(&empty_section).unwrap_err(),
            SemanticError::EmptyDatabase
        );
    }

    #[test]
    fn test_floating_marker_and_duplicate_ids() {
        let root = SyntaxNode::new(
            rules::ROOT,
            vec![
                SyntaxNode::new(
                    rules::MESSAGES,
                    vec![
                        message("1", "First", vec![signal("Value", "0")]),
                        message("1", "Shadow", vec![signal("Value", "8")]),
                    ],
                ),
                sigval("1", "Value", "2"),
            ],
        );
        let db = assemble(Some(&root)).unwrap();
        assert!(db.uses_floating_signals());
        assert_eq!(db.messages().len(), 2);
        assert_eq!(db.get_message_by_id(1).map(|m| m.name.as_str()), Some("First"));
        for msg in db.messages() {
            assert_eq!(msg.signals[0].float_format.to_string(), "double");
        }
    }

    #[test]
    fn test_no_floating_marker_without_sigval() {
        let root = SyntaxNode::new(
            rules::ROOT,
            vec![SyntaxNode::new(
                rules::MESSAGES,
                vec![message("1", "First", vec![signal("Value", "0")])],
            )],
        );
        let db = assemble(Some(&root)).unwrap();
        assert!(!db.uses_floating_signals());
        assert!(db.messages()[0].attributes.is_empty());
    }

    #[test]
    fn test_attribute_defaults_reach_every_object() {
        let root = SyntaxNode::new(
            rules::ROOT,
            vec![
                SyntaxNode::new(
                    rules::MESSAGES,
                    vec![
                        message("1", "A", vec![signal("X", "0")]),
                        message("2", "B", Vec::new()),
                    ],
                ),
                SyntaxNode::new(
                    rules::ATTRIBUTE_DEFINITIONS,
                    vec![SyntaxNode::new(
                        rules::ATTRIBUTE_DEFINITION,
                        vec![
                            SyntaxNode::leaf(rules::ATTRIBUTE_NAME, "Owner"),
                            SyntaxNode::leaf(rules::OBJECT_TYPE, "BO_"),
                            SyntaxNode::new(
                                rules::ATTRIBUTE_VALUE_TYPE,
                                vec![SyntaxNode::leaf(rules::KIND, "STRING")],
                            ),
                        ],
                    )],
                ),
            ],
        );
        let db = assemble(Some(&root)).unwrap();
        for msg in db.messages() {
            assert_eq!(
                db.attribute_value(&msg.attributes, "Owner"),
                Some(&AttrValue::Str(String::new()))
            );
            for sig in &msg.signals {
                assert!(sig.attributes.is_empty());
            }
        }
    }
}
