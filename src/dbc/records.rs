//! Reference record rendering of a [`DatabaseDBC`].
//!
//! The records mirror the hierarchical struct layout consumed by downstream tooling: one
//! [`MessageRecord`] per message, holding its [`SignalRecord`]s, each carrying its
//! [`AttributeRecord`]s and, when linked, its value table. Field names are serialized verbatim
//! (`Name`, `SendECU`, `Endianess`, ...).
//!
//! Reading a record back with [`MessageRecord::to_message`] / [`SignalRecord::to_signal`]
//! restores every scalar field; attribute slots and value-table links are database relative
//! and are not restored.

use serde_derive::{Deserialize, Serialize};

use crate::dbc::types::{
    attributes::{AttrKind, AttrType, AttrValue, AttributeValue, compact_float},
    database::DatabaseDBC,
    errors::SemanticError,
    message::MessageDBC,
    signal::{Endianness, FloatFormat, MuxRole, SignalDBC, Signess},
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MessageRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "SendECU")]
    pub send_ecu: String,
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "DLC")]
    pub dlc: u16,
    #[serde(rename = "Signals")]
    pub signals: Vec<SignalRecord>,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "Attribute")]
    pub attributes: Vec<AttributeRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SignalRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Start")]
    pub start: u16,
    #[serde(rename = "Length")]
    pub length: u16,
    /// `"motorola"` or `"intel"`.
    #[serde(rename = "Endianess")]
    pub endianess: String,
    #[serde(rename = "Scaling")]
    pub scaling: f64,
    #[serde(rename = "Offset")]
    pub offset: f64,
    #[serde(rename = "Minimum")]
    pub minimum: f64,
    #[serde(rename = "Maximum")]
    pub maximum: f64,
    /// `"true"` or `"false"`.
    #[serde(rename = "Signed")]
    pub signed: String,
    #[serde(rename = "Units")]
    pub units: String,
    /// `"N/A"`, `"multiplexor"` or the switch value.
    #[serde(rename = "Multiplexed")]
    pub multiplexed: String,
    /// `"no"`, `"single"` or `"double"`.
    #[serde(rename = "Floating")]
    pub floating: String,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "Receiving")]
    pub receiving: Vec<String>,
    #[serde(rename = "Attribute")]
    pub attributes: Vec<AttributeRecord>,
    #[serde(rename = "Val", default, skip_serializing_if = "Option::is_none")]
    pub val: Option<Vec<ValRecord>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValRecord {
    #[serde(rename = "Value")]
    pub value: i64,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AttributeRecord {
    #[serde(rename = "Name")]
    pub name: String,
    /// `"INT"`, `"HEX"`, `"FLOAT"`, `"STRING"` or `"ENUM"`.
    #[serde(rename = "AttributeType")]
    pub attribute_type: String,
    #[serde(rename = "Value")]
    pub value: RecordValue,
    #[serde(rename = "Values")]
    pub values: RecordValues,
}

/// Scalar attribute value: integers for INT/HEX, floats for FLOAT, text for STRING/ENUM.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum RecordValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// What the definition allows: bounds, the STRING default or the ENUM labels.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum RecordValues {
    // before `Range`, which would also accept a two-element list
    Labels(Vec<String>),
    Range {
        #[serde(rename = "Min")]
        min: RecordValue,
        #[serde(rename = "Max")]
        max: RecordValue,
    },
    Default(String),
}

/// Renders every message of `db`, in declaration order.
pub fn render(db: &DatabaseDBC) -> Vec<MessageRecord> {
    db.iter_messages()
        .map(|msg| MessageRecord::from_message(db, msg))
        .collect()
}

impl MessageRecord {
    pub fn from_message(db: &DatabaseDBC, msg: &MessageDBC) -> Self {
        MessageRecord {
            name: msg.name.clone(),
            send_ecu: msg.sender.clone(),
            id: msg.id,
            dlc: msg.byte_length,
            signals: msg
                .signals
                .iter()
                .map(|sig| SignalRecord::from_signal(db, sig))
                .collect(),
            comment: msg.comment.clone(),
            attributes: attribute_records(db, &msg.attributes),
        }
    }

    /// Message scalars and signals; attribute slots are left empty.
    pub fn to_message(&self) -> Result<MessageDBC, SemanticError> {
        Ok(MessageDBC {
            id: self.id,
            name: self.name.clone(),
            sender: self.send_ecu.clone(),
            byte_length: self.dlc,
            signals: self
                .signals
                .iter()
                .map(SignalRecord::to_signal)
                .collect::<Result<_, _>>()?,
            comment: self.comment.clone(),
            attributes: Vec::new(),
        })
    }
}

impl SignalRecord {
    pub fn from_signal(db: &DatabaseDBC, sig: &SignalDBC) -> Self {
        SignalRecord {
            name: sig.name.clone(),
            start: sig.bit_start,
            length: sig.bit_length,
            endianess: sig.endian.to_string(),
            scaling: sig.factor,
            offset: sig.offset,
            minimum: sig.min,
            maximum: sig.max,
            signed: sig.sign.to_string(),
            units: sig.unit.clone(),
            multiplexed: sig.mux.to_string(),
            floating: sig.float_format.to_string(),
            comment: sig.comment.clone(),
            receiving: sig.receiver_nodes.clone(),
            attributes: attribute_records(db, &sig.attributes),
            val: db.value_table_of(sig).map(|table| {
                table
                    .items
                    .iter()
                    .map(|item| ValRecord {
                        value: item.value,
                        description: item.label.clone(),
                    })
                    .collect()
            }),
        }
    }

    /// Signal scalars; attribute slots and the value-table link are left empty.
    pub fn to_signal(&self) -> Result<SignalDBC, SemanticError> {
        Ok(SignalDBC {
            name: self.name.clone(),
            bit_start: self.start,
            bit_length: self.length,
            endian: read_back::<Endianness>("Endianess", &self.endianess)?,
            sign: read_back::<Signess>("Signed", &self.signed)?,
            factor: self.scaling,
            offset: self.offset,
            min: self.minimum,
            max: self.maximum,
            unit: self.units.clone(),
            mux: read_back::<MuxRole>("Multiplexed", &self.multiplexed)?,
            receiver_nodes: self.receiving.clone(),
            comment: self.comment.clone(),
            float_format: read_back::<FloatFormat>("Floating", &self.floating)?,
            value_table: None,
            attributes: Vec::new(),
        })
    }
}

impl AttributeRecord {
    /// Record for one attribute slot; `None` if the slot's definition is not part of `db`.
    pub fn from_slot(db: &DatabaseDBC, slot: &AttributeValue) -> Option<Self> {
        let def = db.attribute_definition(slot.definition)?;
        let values: RecordValues = match &def.kind {
            AttrKind::Int { min, max } | AttrKind::Hex { min, max } => RecordValues::Range {
                min: RecordValue::Int(*min),
                max: RecordValue::Int(*max),
            },
            AttrKind::Float { min, max } => RecordValues::Range {
                min: RecordValue::Float(*min),
                max: RecordValue::Float(*max),
            },
            AttrKind::String => RecordValues::Default(def.default.to_string()),
            AttrKind::Enum { values } => RecordValues::Labels(values.clone()),
        };
        let value: RecordValue = match &slot.value {
            AttrValue::Int(v) | AttrValue::Hex(v) => RecordValue::Int(*v),
            AttrValue::Float(v) => RecordValue::Float(*v),
            AttrValue::Str(s) | AttrValue::Enum(s) => RecordValue::Text(s.clone()),
        };
        Some(AttributeRecord {
            name: def.name.clone(),
            attribute_type: def.attr_type().to_string(),
            value,
            values,
        })
    }

    /// Typed value, interpreted through `AttributeType`.
    pub fn to_value(&self) -> Result<AttrValue, SemanticError> {
        let attr_type: AttrType = read_back("AttributeType", &self.attribute_type)?;
        let mismatch = || SemanticError::InvalidNumber {
            rule: "Value",
            text: self.value.to_string(),
        };
        Ok(match (attr_type, &self.value) {
            (AttrType::Int, RecordValue::Int(v)) => AttrValue::Int(*v),
            (AttrType::Hex, RecordValue::Int(v)) => AttrValue::Hex(*v),
            (AttrType::Float, RecordValue::Float(v)) => AttrValue::Float(*v),
            (AttrType::Float, RecordValue::Int(v)) => AttrValue::Float(*v as f64),
            (AttrType::String, RecordValue::Text(s)) => AttrValue::Str(s.clone()),
            (AttrType::Enum, RecordValue::Text(s)) => AttrValue::Enum(s.clone()),
            _ => return Err(mismatch()),
        })
    }
}

impl std::fmt::Display for RecordValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordValue::Int(v) => write!(f, "{v}"),
            RecordValue::Float(v) => f.write_str(&compact_float(*v)),
            RecordValue::Text(s) => f.write_str(s),
        }
    }
}

fn attribute_records(db: &DatabaseDBC, slots: &[AttributeValue]) -> Vec<AttributeRecord> {
    slots
        .iter()
        .filter_map(|slot| AttributeRecord::from_slot(db, slot))
        .collect()
}

fn read_back<T: std::str::FromStr>(field: &'static str, text: &str) -> Result<T, SemanticError> {
    text.parse::<T>().map_err(|_| SemanticError::InvalidNumber {
        rule: field,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::types::{
        attributes::{AttrObject, AttributeDefinition},
        value_table::{ValueTableDBC, ValueTableItem},
    };

    fn database() -> DatabaseDBC {
        let mut db = DatabaseDBC::default();
        let table = db.add_value_table(ValueTableDBC {
            message_id: 100,
            name: "Mode".into(),
            items: vec![
                ValueTableItem {
                    value: 0,
                    label: "Off".into(),
                },
                ValueTableItem {
                    value: 1,
                    label: "Idle".into(),
                },
            ],
        });
        let priority = db.add_attribute_definition(AttributeDefinition {
            name: "Priority".into(),
            object_type: AttrObject::Message,
            kind: AttrKind::Int { min: 0, max: 15 },
            default: AttrValue::Int(5),
        });
        let send = db.add_attribute_definition(AttributeDefinition {
            name: "SendType".into(),
            object_type: AttrObject::Signal,
            kind: AttrKind::Enum {
                values: vec!["Cyclic".into(), "OnChange".into()],
            },
            default: AttrValue::Enum("Cyclic".into()),
        });
        db.push_message(MessageDBC {
            id: 100,
            name: "Engine".into(),
            sender: "Motor".into(),
            byte_length: 8,
            comment: Some("Engine frame".into()),
            attributes: vec![AttributeValue {
                definition: priority,
                value: AttrValue::Int(9),
            }],
            signals: vec![SignalDBC {
                name: "Mode".into(),
                bit_start: 0,
                bit_length: 4,
                endian: Endianness::Motorola,
                sign: Signess::Signed,
                factor: 0.5,
                offset: -1.0,
                min: -1.0,
                max: 6.5,
                unit: "none".into(),
                mux: MuxRole::Multiplexed(3),
                receiver_nodes: vec!["Dash".into(), "Gateway".into()],
                comment: None,
                float_format: FloatFormat::Single,
                value_table: Some(table),
                attributes: vec![AttributeValue {
                    definition: send,
                    value: AttrValue::Enum("OnChange".into()),
                }],
            }],
        });
        db
    }

    #[test]
    fn test_render_field_values() {
        let db = database();
        let records = render(&db);
        assert_eq!(records.len(), 1);
        let msg = &records[0];
        assert_eq!(msg.send_ecu, "Motor");
        assert_eq!(msg.attributes[0].attribute_type, "INT");
        assert_eq!(msg.attributes[0].value, RecordValue::Int(9));
        assert_eq!(
            msg.attributes[0].values,
            RecordValues::Range {
                min: RecordValue::Int(0),
                max: RecordValue::Int(15)
            }
        );

        let sig = &msg.signals[0];
        assert_eq!(sig.endianess, "motorola");
        assert_eq!(sig.signed, "true");
        assert_eq!(sig.multiplexed, "3");
        assert_eq!(sig.floating, "single");
        assert_eq!(sig.attributes[0].value, RecordValue::Text("OnChange".into()));
        assert_eq!(
            sig.attributes[0].values,
            RecordValues::Labels(vec!["Cyclic".into(), "OnChange".into()])
        );
        let val = sig.val.as_ref().unwrap();
        assert_eq!(val[1].description, "Idle");
    }

    #[test]
    fn test_json_round_trip_keeps_scalars() {
        let db = database();
        let records = render(&db);
        let json = serde_json::to_string(&records).unwrap();
        assert!(json.contains("\"SendECU\":\"Motor\""));
        assert!(json.contains("\"Endianess\":\"motorola\""));

        let back: Vec<MessageRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records);

        let original = &db.messages()[0];
        let msg = back[0].to_message().unwrap();
        assert_eq!(msg.id, original.id);
        assert_eq!(msg.name, original.name);
        assert_eq!(msg.sender, original.sender);
        assert_eq!(msg.byte_length, original.byte_length);
        assert_eq!(msg.comment, original.comment);

        let mut expected = original.signals[0].clone();
        expected.value_table = None;
        expected.attributes.clear();
        assert_eq!(msg.signals[0], expected);

        assert_eq!(back[0].attributes[0].to_value(), Ok(AttrValue::Int(9)));
        assert_eq!(
            back[0].signals[0].attributes[0].to_value(),
            Ok(AttrValue::Enum("OnChange".into()))
        );
    }

    #[test]
    fn test_bad_enum_text_is_rejected() {
        let db = database();
        let mut record = render(&db).remove(0).signals.remove(0);
        record.endianess = "big".into();
        assert_eq!(
            record.to_signal(),
            Err(SemanticError::InvalidNumber {
                rule: "Endianess",
                text: "big".into()
            })
        );
    }
}
