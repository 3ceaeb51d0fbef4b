//! DatabaseDBC model.
//!
//! This module defines the in-memory **CAN database** produced by one assembly run over a DBC
//! syntax tree. Messages are owned in declaration order and own their signals; value tables and
//! attribute definitions live in **SlotMap** arenas with stable keys ([`ValueTableKey`],
//! [`AttributeKey`]) so that signals and attribute slots can reference them without copies.
//!
//! **Lookups** by CAN ID and by name resolve to the first declared message, matching the
//! order in which the DBC declares them.

use slotmap::SlotMap;
use std::collections::HashMap;

use crate::dbc::types::{
    attributes::{AttrObject, AttrValue, AttributeDefinition, AttributeKey, AttributeValue},
    message::MessageDBC,
    signal::SignalDBC,
    value_table::{ValueTableDBC, ValueTableKey},
};

/// In-memory representation of a CAN database (DBC).
#[derive(Default, Clone, Debug)]
pub struct DatabaseDBC {
    // --- Main storage ---
    pub(crate) messages: Vec<MessageDBC>,
    pub(crate) value_tables: SlotMap<ValueTableKey, ValueTableDBC>,
    pub(crate) attribute_definitions: SlotMap<AttributeKey, AttributeDefinition>,

    // --- Order "views" (declaration order) ---
    pub(crate) value_tables_order: Vec<ValueTableKey>,
    pub(crate) attribute_definitions_order: Vec<AttributeKey>,

    /// True when the DBC declares at least one `SIG_VALTYPE_` record.
    pub(crate) use_float: bool,

    // --- Lookups (first declaration wins) ---
    pub(crate) msg_idx_by_id: HashMap<u32, usize>,
    pub(crate) msg_idx_by_name: HashMap<String, usize>,
}

impl DatabaseDBC {
    // ------------- Messages ------------
    /// Appends a message and indexes its id/name. Earlier messages keep their lookup entries.
    pub(crate) fn push_message(&mut self, message: MessageDBC) {
        let idx: usize = self.messages.len();
        self.msg_idx_by_id.entry(message.id).or_insert(idx);
        self.msg_idx_by_name
            .entry(message.name.clone())
            .or_insert(idx);
        self.messages.push(message);
    }

    /// Messages in declaration order.
    pub fn messages(&self) -> &[MessageDBC] {
        &self.messages
    }

    pub fn iter_messages(&self) -> impl Iterator<Item = &MessageDBC> + '_ {
        self.messages.iter()
    }

    /// Every signal of every message, message by message.
    pub fn iter_signals(&self) -> impl Iterator<Item = &SignalDBC> + '_ {
        self.messages.iter().flat_map(|m| m.signals.iter())
    }

    pub(crate) fn message_index_by_id(&self, id: u32) -> Option<usize> {
        self.msg_idx_by_id.get(&id).copied()
    }

    /// Returns a `&MessageDBC` given the numeric CAN ID.
    pub fn get_message_by_id(&self, id: u32) -> Option<&MessageDBC> {
        let idx: usize = self.message_index_by_id(id)?;
        self.messages.get(idx)
    }

    pub(crate) fn get_message_by_id_mut(&mut self, id: u32) -> Option<&mut MessageDBC> {
        let idx: usize = self.message_index_by_id(id)?;
        self.messages.get_mut(idx)
    }

    /// Returns a `&MessageDBC` given its name (case-sensitive).
    pub fn get_message_by_name(&self, name: &str) -> Option<&MessageDBC> {
        let idx: usize = *self.msg_idx_by_name.get(name)?;
        self.messages.get(idx)
    }

    /// Returns the signal `signal_name` of the message with CAN ID `id`.
    pub fn get_signal(&self, id: u32, signal_name: &str) -> Option<&SignalDBC> {
        self.get_message_by_id(id)?.get_signal_by_name(signal_name)
    }

    // ------------- Value tables ------------
    pub(crate) fn add_value_table(&mut self, table: ValueTableDBC) -> ValueTableKey {
        let key: ValueTableKey = self.value_tables.insert(table);
        self.value_tables_order.push(key);
        key
    }

    /// Value tables in declaration order.
    pub fn iter_value_tables(&self) -> impl Iterator<Item = &ValueTableDBC> + '_ {
        self.value_tables_order
            .iter()
            .filter_map(|&key| self.value_tables.get(key))
    }

    pub fn get_value_table_by_key(&self, key: ValueTableKey) -> Option<&ValueTableDBC> {
        self.value_tables.get(key)
    }

    /// Value table linked to `signal`, if any.
    pub fn value_table_of(&self, signal: &SignalDBC) -> Option<&ValueTableDBC> {
        signal
            .value_table
            .and_then(|key| self.get_value_table_by_key(key))
    }

    // ------------- Attributes ------------
    pub(crate) fn add_attribute_definition(&mut self, def: AttributeDefinition) -> AttributeKey {
        let key: AttributeKey = self.attribute_definitions.insert(def);
        self.attribute_definitions_order.push(key);
        key
    }

    /// Attribute definitions in declaration order.
    pub fn iter_attribute_definitions(&self) -> impl Iterator<Item = &AttributeDefinition> + '_ {
        self.attribute_definitions_order
            .iter()
            .filter_map(|&key| self.attribute_definitions.get(key))
    }

    pub fn attribute_definition(&self, key: AttributeKey) -> Option<&AttributeDefinition> {
        self.attribute_definitions.get(key)
    }

    /// First definition named `name` whose object type is `object_type`.
    pub fn get_attribute_definition(
        &self,
        name: &str,
        object_type: AttrObject,
    ) -> Option<&AttributeDefinition> {
        self.iter_attribute_definitions()
            .find(|def| def.object_type == object_type && def.name == name)
    }

    /// Value of the attribute slot named `name` among `slots` (message or signal attributes).
    pub fn attribute_value<'a>(
        &'a self,
        slots: &'a [AttributeValue],
        name: &str,
    ) -> Option<&'a AttrValue> {
        slots
            .iter()
            .find(|slot| {
                self.attribute_definition(slot.definition)
                    .is_some_and(|def| def.name == name)
            })
            .map(|slot| &slot.value)
    }

    /// True when the DBC carries `SIG_VALTYPE_` floating-point declarations.
    pub fn uses_floating_signals(&self) -> bool {
        self.use_float
    }
}
