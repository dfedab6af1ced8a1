//! Enums for the type codes and stream properties used on the wire.
use std::fmt::{self, Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The single-byte discriminator identifying which message schema an instance
/// uses. The discriminant of each variant is the literal type-code byte as it
/// appears on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MessageType {
    /// A seconds timestamp, the reference point for subsequent nanosecond
    /// offsets.
    Timestamp = b'T',
    /// A system event.
    SystemEvent = b'S',
    /// A stock directory entry.
    StockDirectory = b'R',
    /// A stock trading action.
    TradingAction = b'H',
    /// A Reg SHO short sale price test restriction.
    RegSho = b'Y',
    /// A market participant position.
    MarketParticipantPosition = b'L',
    /// A broken trade.
    BrokenTrade = b'B',
    /// A net order imbalance indicator.
    Imbalance = b'I',
    /// A retail price improvement indicator.
    RetailPriceImprovement = b'N',
    /// An order added to the book without attribution.
    AddOrder = b'A',
    /// An order added to the book with MPID attribution.
    AddOrderMpid = b'F',
    /// An order executed in whole or in part.
    OrderExecuted = b'E',
    /// An order executed at a price different from its display price.
    OrderExecutedWithPrice = b'C',
    /// An order partially canceled.
    OrderCancel = b'X',
    /// An order removed from the book.
    OrderDelete = b'D',
    /// An order replaced by a new order.
    OrderReplace = b'U',
    /// A match of a non-displayed order.
    Trade = b'P',
    /// A cross trade.
    CrossTrade = b'Q',
}

impl MessageType {
    /// Returns the type code as a `char`.
    pub fn as_char(&self) -> char {
        char::from(u8::from(*self))
    }
}

impl Display for MessageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// How the input is compressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed.
    #[default]
    None,
    /// Zstandard compressed.
    ZStd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_round_trips_through_u8() {
        for code in [
            b'T', b'S', b'R', b'H', b'Y', b'L', b'B', b'I', b'N', b'A', b'F', b'E', b'C', b'X',
            b'D', b'U', b'P', b'Q',
        ] {
            let msg_type = MessageType::try_from(code).unwrap();
            assert_eq!(u8::from(msg_type), code);
            assert_eq!(msg_type.as_char(), char::from(code));
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert!(MessageType::try_from(b'Z').is_err());
        assert!(MessageType::try_from(0).is_err());
    }
}
