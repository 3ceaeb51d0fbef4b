use crate::dbc::types::{attributes::AttributeValue, signal::SignalDBC};

/// CAN message defined in the database (DBC).
///
/// Owns its signals (sorted ascending by start bit once assembled) and one attribute slot
/// per message-scoped attribute definition.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct MessageDBC {
    /// Numeric CAN ID (base 10).
    pub id: u32,
    /// Message name.
    pub name: String,
    /// Transmitting node (ECU).
    pub sender: String,
    /// Payload length in bytes (DLC).
    pub byte_length: u16,
    /// Signals that belong to this message.
    pub signals: Vec<SignalDBC>,
    /// Associated comment (DBC `CM_ BO_` section).
    pub comment: Option<String>,

    // --- Message Attribute Entry ---
    pub attributes: Vec<AttributeValue>,
}

impl MessageDBC {
    /// First signal with the given name (case-sensitive, as in the DBC).
    pub fn get_signal_by_name(&self, name: &str) -> Option<&SignalDBC> {
        self.signals.iter().find(|s| s.name == name)
    }

    pub fn get_signal_by_name_mut(&mut self, name: &str) -> Option<&mut SignalDBC> {
        self.signals.iter_mut().find(|s| s.name == name)
    }

    /// The multiplexer switch signal, if any.
    pub fn multiplexor(&self) -> Option<&SignalDBC> {
        self.signals.iter().find(|s| s.is_multiplexor())
    }

    /// Stable sort by ascending start bit.
    pub(crate) fn sort_signals_by_start_bit(&mut self) {
        self.signals.sort_by_key(|s| s.bit_start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::types::signal::MuxRole;

    fn sig(name: &str, bit_start: u16) -> SignalDBC {
        SignalDBC {
            name: name.to_string(),
            bit_start,
            bit_length: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_keeps_ties_in_declaration_order() {
        let mut msg = MessageDBC {
            signals: vec![sig("c", 8), sig("a", 0), sig("b", 8), sig("d", 4)],
            ..Default::default()
        };
        msg.sort_signals_by_start_bit();
        let names: Vec<&str> = msg.signals.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "d", "c", "b"]);
    }

    #[test]
    fn test_multiplexor_lookup() {
        let mut mode = sig("Mode", 0);
        mode.mux = MuxRole::Multiplexor;
        let msg = MessageDBC {
            signals: vec![sig("Speed", 8), mode],
            ..Default::default()
        };
        assert_eq!(msg.multiplexor().map(|s| s.name.as_str()), Some("Mode"));
        assert!(msg.get_signal_by_name("speed").is_none());
        assert!(msg.get_signal_by_name("Speed").is_some());
    }
}
