//! Quantity steppers for cart lines

use crate::dom::{Document, NodeId, Selector};
use crate::page::{EventKind, EventTarget, Handler, ListenerRegistry};

pub const CONTROL_CLASS: &str = "quantity-control";
pub const MINUS_CLASS: &str = "quantity-minus";
pub const PLUS_CLASS: &str = "quantity-plus";
pub const INPUT_CLASS: &str = "quantity-input";

/// Lowest quantity the minus button steps down to
pub const MIN_QUANTITY: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityHandler {
    Decrement { input: NodeId },
    Increment { input: NodeId },
}

pub fn init<D: Document + ?Sized>(doc: &D, listeners: &mut ListenerRegistry) {
    for container in doc.query_all(&Selector::class(CONTROL_CLASS)) {
        let minus = doc.query_first_within(container, &Selector::class(MINUS_CLASS));
        let plus = doc.query_first_within(container, &Selector::class(PLUS_CLASS));
        let input = doc.query_first_within(container, &Selector::class(INPUT_CLASS));

        let (Some(minus), Some(plus), Some(input)) = (minus, plus, input) else {
            continue;
        };

        listeners.add(
            EventTarget::Node(minus),
            EventKind::Click,
            Handler::Quantity(QuantityHandler::Decrement { input }),
        );
        listeners.add(
            EventTarget::Node(plus),
            EventKind::Click,
            Handler::Quantity(QuantityHandler::Increment { input }),
        );
    }
}

/// Apply a step. Returns the input when its value changed, so the caller can
/// announce the change.
pub fn step<D: Document + ?Sized>(doc: &mut D, handler: QuantityHandler) -> Option<NodeId> {
    match handler {
        QuantityHandler::Decrement { input } => {
            let current = parse_quantity(&doc.value(input));
            if current <= MIN_QUANTITY {
                return None;
            }
            doc.set_value(input, &(current - 1).to_string());
            Some(input)
        }
        QuantityHandler::Increment { input } => {
            let current = parse_quantity(&doc.value(input));
            doc.set_value(input, &current.saturating_add(1).to_string());
            Some(input)
        }
    }
}

/// Leading integer of `raw`, or 0 when there is none ("3 items" is 3)
pub fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}
