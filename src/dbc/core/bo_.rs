use std::collections::HashMap;

use crate::dbc::core::{
    sg_,
    sig_valtype_::FloatIndex,
    syntax::{SyntaxNode, rules},
};
use crate::dbc::types::{
    errors::SemanticError,
    message::MessageDBC,
    signal::SignalDBC,
    value_table::ValueTableKey,
};

/// Value tables reachable by `(message id, signal name)`, first declaration wins.
pub(crate) type TableIndex<'a> = HashMap<(u32, &'a str), ValueTableKey>;

/// Decode a `BO_` subtree and every `SG_` it contains.
/// Shape: `BO_ <id> <name>: <dlc> <sender>`
///
/// Signals are linked to their value table, checked for a single multiplexor switch and
/// sorted ascending by start bit (stable).
pub(crate) fn decode(
    bo: &SyntaxNode,
    floats: &FloatIndex<'_>,
    tables: &TableIndex<'_>,
) -> Result<MessageDBC, SemanticError> {
    let id: u32 = bo.require_number(rules::ID)?;
    let name: String = bo.require_text(rules::NAME)?.to_string();
    let sender: String = bo.require_text(rules::ECU)?.to_string();
    let byte_length: u16 = bo.require_number(rules::DLC)?;

    let mut signals: Vec<SignalDBC> = bo
        .children_of(rules::SIGNAL)
        .map(|sg| sg_::decode(sg, id, floats))
        .collect::<Result<_, SemanticError>>()?;

    for sig in signals.iter_mut() {
        sig.value_table = tables.get(&(id, sig.name.as_str())).copied();
    }

    let mut message = MessageDBC {
        id,
        name,
        sender,
        byte_length,
        signals,
        comment: None,
        attributes: Vec::new(),
    };
    check_single_multiplexor(&message)?;
    if message.signals.len() > 1 {
        message.sort_signals_by_start_bit();
    }

    tracing::debug!(
        "{} id:{} dlc:{} signals:{} ecu:{}",
        message.name,
        message.id,
        message.byte_length,
        message.signals.len(),
        message.sender
    );
    Ok(message)
}

fn check_single_multiplexor(message: &MessageDBC) -> Result<(), SemanticError> {
    let mut switches = message.signals.iter().filter(|s| s.is_multiplexor());
    if let (Some(first), Some(second)) = (switches.next(), switches.next()) {
        return Err(SemanticError::MultipleMultiplexors {
            message: message.name.clone(),
            id: message.id,
            first: first.name.clone(),
            second: second.name.clone(),
        });
    }
    Ok(())
}
