use slotmap::new_key_type;
use std::fmt;
use std::str::FromStr;

new_key_type! { pub struct AttributeKey; }

/// Attribute definition as declared by a `BA_DEF_` line, completed by its `BA_DEF_DEF_` default.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDefinition {
    /// Attribute name.
    pub name: String,
    /// Kind of object the attribute applies to.
    pub object_type: AttrObject,
    /// Value kind and its metadata (range or labels).
    pub kind: AttrKind,
    /// Default value, always of the same kind as `kind`.
    pub default: AttrValue,
}

impl AttributeDefinition {
    pub fn attr_type(&self) -> AttrType {
        self.kind.attr_type()
    }

    pub fn minimum_to_string(&self) -> String {
        match &self.kind {
            AttrKind::Int { min, .. } | AttrKind::Hex { min, .. } => min.to_string(),
            AttrKind::Float { min, .. } => compact_float(*min),
            AttrKind::String | AttrKind::Enum { .. } => String::new(),
        }
    }

    pub fn maximum_to_string(&self) -> String {
        match &self.kind {
            AttrKind::Int { max, .. } | AttrKind::Hex { max, .. } => max.to_string(),
            AttrKind::Float { max, .. } => compact_float(*max),
            AttrKind::String | AttrKind::Enum { .. } => String::new(),
        }
    }
}

/// Value kind of an attribute definition, with the metadata each kind carries.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrKind {
    Int { min: i64, max: i64 },
    Hex { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    String,
    Enum { values: Vec<String> },
}

impl AttrKind {
    pub fn attr_type(&self) -> AttrType {
        match self {
            AttrKind::Int { .. } => AttrType::Int,
            AttrKind::Hex { .. } => AttrType::Hex,
            AttrKind::Float { .. } => AttrType::Float,
            AttrKind::String => AttrType::String,
            AttrKind::Enum { .. } => AttrType::Enum,
        }
    }

    /// Labels of an `ENUM` kind, empty for every other kind.
    pub fn enum_values(&self) -> &[String] {
        match self {
            AttrKind::Enum { values } => values,
            _ => &[],
        }
    }
}

/// Attribute value kinds as declared by `BA_DEF_` lines in DBC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AttrType {
    #[default]
    String,
    Int,
    Hex,
    Float,
    Enum,
}

impl AttrType {
    /// Keyword used by the DBC grammar (`INT`, `HEX`, ...).
    pub fn keyword(&self) -> &'static str {
        match self {
            AttrType::String => "STRING",
            AttrType::Int => "INT",
            AttrType::Hex => "HEX",
            AttrType::Float => "FLOAT",
            AttrType::Enum => "ENUM",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for AttrType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STRING" => Ok(AttrType::String),
            "INT" => Ok(AttrType::Int),
            "HEX" => Ok(AttrType::Hex),
            "FLOAT" => Ok(AttrType::Float),
            "ENUM" => Ok(AttrType::Enum),
            other => Err(other.to_string()),
        }
    }
}

/// Concrete attribute value stored on message/signal slots and as definition default.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Hex(i64),
    Float(f64),
    /// Label resolved from the definition's label list.
    Enum(String),
}

impl AttrValue {
    pub fn attr_type(&self) -> AttrType {
        match self {
            AttrValue::Str(_) => AttrType::String,
            AttrValue::Int(_) => AttrType::Int,
            AttrValue::Hex(_) => AttrType::Hex,
            AttrValue::Float(_) => AttrType::Float,
            AttrValue::Enum(_) => AttrType::Enum,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => write!(f, "{}", s),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Hex(h) if *h < 0 => write!(f, "-0x{:X}", h.unsigned_abs()),
            AttrValue::Hex(h) => write!(f, "0x{:X}", h),
            AttrValue::Float(x) => write!(f, "{}", compact_float(*x)),
            AttrValue::Enum(s) => write!(f, "{}", s),
        }
    }
}

/// One attribute slot on a message or signal.
///
/// Slots are created for every definition of the matching object type, seeded with the
/// definition default, and possibly overwritten once by a `BA_` assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeValue {
    /// Definition this slot instantiates (owned by the database).
    pub definition: AttributeKey,
    /// Current value.
    pub value: AttrValue,
}

/// The type of Object of the Attribute
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AttrObject {
    Node,
    Message,
    Signal,
    /// Also used when the definition carries no object token.
    #[default]
    Event,
}

impl AttrObject {
    /// Maps the grammar's object token (`BU_`, `BO_`, `SG_`, `EV_`); absence means [`AttrObject::Event`].
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("BU_") => AttrObject::Node,
            Some("BO_") => AttrObject::Message,
            Some("SG_") => AttrObject::Signal,
            _ => AttrObject::Event,
        }
    }
}

impl fmt::Display for AttrObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttrObject::Node => "Node",
            AttrObject::Message => "Message",
            AttrObject::Signal => "Signal",
            AttrObject::Event => "Event",
        })
    }
}

// compact print, no superfluous trailing zeros
pub(crate) fn compact_float(v: f64) -> String {
    let mut s: String = v.to_string();
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}
