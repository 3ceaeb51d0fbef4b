use slotmap::new_key_type;

new_key_type! { pub struct ValueTableKey; }

/// Value table declared by a `VAL_` line for one signal of one message.
///
/// The table lives in the database arena; signals reference it through a [`ValueTableKey`].
#[derive(Default, Clone, PartialEq, Debug)]
pub struct ValueTableDBC {
    /// CAN ID of the message whose signal declared the table.
    pub message_id: u32,
    /// Name of the declaring signal.
    pub name: String,
    /// Items sorted ascending by value.
    pub items: Vec<ValueTableItem>,
}

/// One `<value> "<label>"` pair of a value table.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct ValueTableItem {
    pub value: i64,
    pub label: String,
}

impl ValueTableDBC {
    /// Sorts items ascending by value; equal values keep their declaration order.
    pub fn sort_items(&mut self) {
        self.items.sort_by_key(|item| item.value);
    }

    /// Label of the first item carrying `value`.
    pub fn label_of(&self, value: i64) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.value == value)
            .map(|item| item.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(value: i64, label: &str) -> ValueTableItem {
        ValueTableItem {
            value,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_sort_items_is_stable_and_idempotent() {
        let mut table = ValueTableDBC {
            message_id: 100,
            name: "Mode".into(),
            items: vec![item(1, "Idle"), item(0, "Off"), item(1, "Idle2"), item(-1, "Err")],
        };
        table.sort_items();
        let once = table.items.clone();
        assert_eq!(
            once,
            vec![item(-1, "Err"), item(0, "Off"), item(1, "Idle"), item(1, "Idle2")]
        );
        table.sort_items();
        assert_eq!(table.items, once);
    }

    #[test]
    fn test_label_lookup() {
        let table = ValueTableDBC {
            message_id: 1,
            name: "S".into(),
            items: vec![item(0, "Off"), item(1, "On")],
        };
        assert_eq!(table.label_of(1), Some("On"));
        assert_eq!(table.label_of(7), None);
    }
}
