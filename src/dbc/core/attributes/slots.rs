use std::collections::HashMap;

use crate::dbc::types::{
    attributes::{AttrObject, AttributeKey, AttributeValue},
    database::DatabaseDBC,
};

/// Per-scope attribute layout: the slot vector every message (and every signal) starts from.
///
/// Slots follow definition order and hold the definition default. Node and event scoped
/// definitions get no slots.
#[derive(Default, Debug)]
pub(crate) struct AttributeTableBuilder {
    message: Vec<AttributeValue>,
    signal: Vec<AttributeValue>,
    message_pos: HashMap<String, usize>,
    signal_pos: HashMap<String, usize>,
}

impl AttributeTableBuilder {
    pub(crate) fn from_definitions(db: &DatabaseDBC) -> Self {
        let mut builder = AttributeTableBuilder::default();
        for &key in &db.attribute_definitions_order {
            let Some(def) = db.attribute_definitions.get(key) else {
                continue;
            };
            let (slots, positions) = match def.object_type {
                AttrObject::Message => (&mut builder.message, &mut builder.message_pos),
                AttrObject::Signal => (&mut builder.signal, &mut builder.signal_pos),
                AttrObject::Node | AttrObject::Event => continue,
            };
            positions.entry(def.name.clone()).or_insert(slots.len());
            slots.push(AttributeValue {
                definition: key,
                value: def.default.clone(),
            });
        }
        builder
    }

    /// Gives every message and signal its own copy of the default slots.
    pub(crate) fn instantiate(&self, db: &mut DatabaseDBC) {
        for msg in db.messages.iter_mut() {
            msg.attributes = self.message.clone();
            for sig in msg.signals.iter_mut() {
                sig.attributes = self.signal.clone();
            }
        }
    }

    /// Slot position of attribute `name` in `scope`; the first definition of that name wins.
    pub(crate) fn position(&self, scope: AttrObject, name: &str) -> Option<usize> {
        match scope {
            AttrObject::Message => self.message_pos.get(name).copied(),
            AttrObject::Signal => self.signal_pos.get(name).copied(),
            AttrObject::Node | AttrObject::Event => None,
        }
    }

    pub(crate) fn definition_at(&self, scope: AttrObject, pos: usize) -> Option<AttributeKey> {
        let slots = match scope {
            AttrObject::Message => &self.message,
            AttrObject::Signal => &self.signal,
            AttrObject::Node | AttrObject::Event => return None,
        };
        slots.get(pos).map(|slot| slot.definition)
    }
}
