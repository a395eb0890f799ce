//! Text order commands received by the message listener.
//!
//! Grammar: `!order [xN] <product name...> <contact>`. The prefix is case-insensitive,
//! the optional `xN` token sets the quantity, the last whitespace-separated token is the
//! contact and everything in between is the product name.

use thiserror::Error;

/// Prefix that marks a message as an order command.
pub const ORDER_PREFIX: &str = "!order";

/// A successfully parsed order command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCommand {
    /// Product name as typed
    pub product_name: String,
    /// Contact handle
    pub contact: String,
    /// Requested quantity, 1 if not given
    pub quantity: u32,
}

/// Why a message could not be read as an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The message is not an order command at all.
    #[error("not an order command")]
    NotAnOrder,
    /// Prefix present but no product or contact.
    #[error("usage: !order [xN] <product> <contact>")]
    MissingArguments,
    /// The `xN` token is not a positive number.
    #[error("invalid quantity '{0}'")]
    BadQuantity(String),
}

/// Parses a chat message into an [`OrderCommand`].
///
/// # Errors
/// [`ParseError::NotAnOrder`] for ordinary messages, which the listener ignores; the other
/// variants are reported back to the sender.
pub fn parse_order_command(text: &str) -> Result<OrderCommand, ParseError> {
    let mut tokens = text.split_whitespace().peekable();
    match tokens.next() {
        Some(first) if first.eq_ignore_ascii_case(ORDER_PREFIX) => {}
        _ => return Err(ParseError::NotAnOrder),
    }

    let mut quantity = 1;
    if let Some(count) = tokens
        .peek()
        .and_then(|t| t.strip_prefix('x').or_else(|| t.strip_prefix('X')))
        .filter(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
    {
        quantity = count
            .parse::<u32>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| ParseError::BadQuantity(count.to_string()))?;
        tokens.next();
    }

    let mut rest: Vec<&str> = tokens.collect();
    let contact = rest.pop().ok_or(ParseError::MissingArguments)?;
    if rest.is_empty() {
        return Err(ParseError::MissingArguments);
    }

    Ok(OrderCommand {
        product_name: rest.join(" "),
        contact: contact.to_string(),
        quantity,
    })
}
