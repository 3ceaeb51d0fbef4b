use crate::dbc::types::{
    attributes::AttributeValue,
    value_table::ValueTableKey,
};
use std::fmt;
use std::str::FromStr;

/// Placeholder stored in [`SignalDBC::unit`] when the DBC unit string is blank.
pub const NO_UNIT: &str = "none";

/// Definition of a signal within a CAN message (DBC).
///
/// Describes position/bit-length, endianness, sign, scaling (factor/offset),
/// valid range, unit of measure, multiplexing, value table and receiver nodes.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct SignalDBC {
    /// Signal name.
    pub name: String,
    /// Bit start in the payload.
    pub bit_start: u16,
    /// Bit length.
    pub bit_length: u16,
    /// Endianness.
    pub endian: Endianness,
    /// Sign.
    pub sign: Signess,
    /// Scaling factor.
    pub factor: f64,
    /// Scaling offset.
    pub offset: f64,
    /// Minimum physical value.
    pub min: f64,
    /// Maximum physical value.
    pub max: f64,
    /// Unit of measure, [`NO_UNIT`] when the DBC leaves it blank.
    pub unit: String,
    /// Multiplexing role.
    pub mux: MuxRole,
    /// Receiver node names, in declaration order.
    pub receiver_nodes: Vec<String>,
    /// Associated comment (DBC `CM_ SG_` section).
    pub comment: Option<String>,
    /// IEEE encoding declared by `SIG_VALTYPE_`.
    pub float_format: FloatFormat,
    /// Value table declared for this signal (owned by the database).
    pub value_table: Option<ValueTableKey>,

    // --- Signal Attribute Entry ---
    pub attributes: Vec<AttributeValue>,
}

impl SignalDBC {
    pub fn is_multiplexor(&self) -> bool {
        matches!(self.mux, MuxRole::Multiplexor)
    }

    pub fn is_signed(&self) -> bool {
        matches!(self.sign, Signess::Signed)
    }
}

/// Returns the unit verbatim, or [`NO_UNIT`] if it is empty or whitespace only.
pub fn normalize_unit(raw: &str) -> String {
    if raw.trim().is_empty() {
        NO_UNIT.to_string()
    } else {
        raw.to_string()
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Endianness {
    #[default]
    Motorola, // 0
    Intel, // 1
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endianness::Motorola => "motorola",
            Endianness::Intel => "intel",
        })
    }
}

impl FromStr for Endianness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "motorola" => Ok(Endianness::Motorola),
            "intel" => Ok(Endianness::Intel),
            other => Err(format!("unknown endianness '{other}'")),
        }
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Signess {
    #[default]
    Unsigned, // +
    Signed, // -
}

impl fmt::Display for Signess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Signess::Unsigned => "false",
            Signess::Signed => "true",
        })
    }
}

impl FromStr for Signess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "false" => Ok(Signess::Unsigned),
            "true" => Ok(Signess::Signed),
            other => Err(format!("unknown signedness '{other}'")),
        }
    }
}

/// What role (if any) a signal plays in multiplexing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MuxRole {
    /// Not multiplexed (always present).
    #[default]
    None,
    /// This signal is the multiplexer switch (marked as `M` in DBC).
    Multiplexor,
    /// This signal is gated by the switch value (marked as `mX`).
    Multiplexed(u32),
}

impl fmt::Display for MuxRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuxRole::None => f.write_str("N/A"),
            MuxRole::Multiplexor => f.write_str("multiplexor"),
            MuxRole::Multiplexed(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for MuxRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N/A" => Ok(MuxRole::None),
            "multiplexor" => Ok(MuxRole::Multiplexor),
            other => other
                .parse::<u32>()
                .map(MuxRole::Multiplexed)
                .map_err(|_| format!("unknown multiplexing role '{other}'")),
        }
    }
}

/// IEEE floating-point encoding of a signal (`SIG_VALTYPE_` 1 or 2).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FloatFormat {
    #[default]
    NotFloating,
    Single,
    Double,
}

impl FloatFormat {
    /// Maps a `SIG_VALTYPE_` type code; every code except 1 and 2 means "not floating".
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => FloatFormat::Single,
            2 => FloatFormat::Double,
            _ => FloatFormat::NotFloating,
        }
    }
}

impl fmt::Display for FloatFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FloatFormat::NotFloating => "no",
            FloatFormat::Single => "single",
            FloatFormat::Double => "double",
        })
    }
}

impl FromStr for FloatFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(FloatFormat::NotFloating),
            "single" => Ok(FloatFormat::Single),
            "double" => Ok(FloatFormat::Double),
            other => Err(format!("unknown floating format '{other}'")),
        }
    }
}
