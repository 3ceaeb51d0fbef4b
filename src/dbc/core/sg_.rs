use crate::dbc::core::sig_valtype_::FloatIndex;
use crate::dbc::core::syntax::{SyntaxNode, parse_number, rules};
use crate::dbc::types::{
    errors::SemanticError,
    signal::{Endianness, MuxRole, Signess, SignalDBC, normalize_unit},
};

/// Upper bound of start bit and bit length.
pub(crate) const MAX_BITS: u64 = 64;

/// Decode a `SG_` subtree belonging to message `message_id`.
/// Format (typical):
/// SG_ <name> [M|mX]: <bit_start>|<bit_length>@<endian><sign> (<factor>,<offset>) [<min>|<max>] "<unit>" <receivers...>
///
/// The value table link is resolved by the message builder.
pub(crate) fn decode(
    sg: &SyntaxNode,
    message_id: u32,
    floats: &FloatIndex<'_>,
) -> Result<SignalDBC, SemanticError> {
    // 1) name and bit info: "63|1@1+"
    let name: String = sg.require_text(rules::NAME)?.to_string();
    let bit_start: u16 = bounded(&name, "start bit", sg.require_number(rules::STARTBIT)?, 0)?;
    let bit_length: u16 = bounded(&name, "bit length", sg.require_number(rules::LENGTH)?, 1)?;
    let endian: Endianness = match sg.require_text(rules::ENDIANESS)?.trim() {
        "0" => Endianness::Motorola,
        "1" => Endianness::Intel,
        other => {
            return Err(SemanticError::InvalidNumber {
                rule: rules::ENDIANESS,
                text: other.to_string(),
            });
        }
    };
    let sign: Signess = match sg.require_text(rules::SIGN)?.trim() {
        "+" => Signess::Unsigned,
        "-" => Signess::Signed,
        other => {
            return Err(SemanticError::InvalidNumber {
                rule: rules::SIGN,
                text: other.to_string(),
            });
        }
    };

    // 2) "(factor,offset)" and "[min|max]"
    let (factor, offset) = number_pair(sg.require(rules::Y_MX_C)?)?;
    let (min, max) = number_pair(sg.require(rules::RANGE)?)?;

    // 3) "unit"
    let unit: String = normalize_unit(sg.child_text(rules::UNIT).unwrap_or(""));

    // 4) receivers
    let receiver_nodes: Vec<String> = receivers(sg);

    // 5) multiplexing tag
    let mux: MuxRole = if let Some(value) = sg.child_number::<u32>(rules::MUX_VALUE)? {
        MuxRole::Multiplexed(value)
    } else if sg.child(rules::MUX_SWITCH).is_some() {
        MuxRole::Multiplexor
    } else {
        MuxRole::None
    };

    // 6) SIG_VALTYPE_
    let float_format = floats.format_of(message_id, &name);

    tracing::debug!(
        "\tname => {}; start {} length {} {} {} {} {}",
        name,
        bit_start,
        bit_length,
        unit,
        endian,
        if matches!(sign, Signess::Signed) { "signed" } else { "unsigned" },
        receiver_nodes.first().map(String::as_str).unwrap_or("")
    );

    Ok(SignalDBC {
        name,
        bit_start,
        bit_length,
        endian,
        sign,
        factor,
        offset,
        min,
        max,
        unit,
        mux,
        receiver_nodes,
        comment: None,
        float_format,
        value_table: None,
        attributes: Vec::new(),
    })
}

fn bounded(signal: &str, field: &'static str, value: u64, min: u64) -> Result<u16, SemanticError> {
    if value < min || value > MAX_BITS {
        return Err(SemanticError::FieldOutOfRange {
            signal: signal.to_string(),
            field,
            value,
            min,
            max: MAX_BITS,
        });
    }
    Ok(value as u16)
}

/// First and second `float` of a two-argument production such as `(1,0)` or `[0|255]`.
fn number_pair(node: &SyntaxNode) -> Result<(f64, f64), SemanticError> {
    let mut numbers = node.children_of(rules::FLOAT);
    let mut next = || -> Result<f64, SemanticError> {
        let n = numbers.next().ok_or_else(|| SemanticError::MissingNode {
            rule: rules::FLOAT,
            parent: node.rule.clone(),
        })?;
        parse_number(rules::FLOAT, n.text())
    };
    let first: f64 = next()?;
    let second: f64 = next()?;
    Ok((first, second))
}

/// Node list (`A,B,C`) or, failing that, the single bare node.
fn receivers(sg: &SyntaxNode) -> Vec<String> {
    if let Some(nodes) = sg.child(rules::NODES) {
        return nodes
            .children_of(rules::NODE)
            .map(|n| n.text().to_string())
            .collect();
    }
    sg.child_text(rules::SINGLE_NODE)
        .map(|n| vec![n.to_string()])
        .unwrap_or_default()
}
