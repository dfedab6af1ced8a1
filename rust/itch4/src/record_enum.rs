//! An enum over all ITCH record types, for iterating over messages of mixed
//! schemas.
use crate::{
    enums::MessageType,
    record::{
        AddOrderMpidMsg, AddOrderMsg, BrokenTradeMsg, CrossTradeMsg, ImbalanceMsg,
        MarketParticipantPosMsg, OrderCancelMsg, OrderDeleteMsg, OrderExecutedMsg,
        OrderExecutedWithPriceMsg, OrderReplaceMsg, RegShoMsg, RetailPriceImprovementMsg,
        StockDirectoryMsg, SystemEventMsg, TimestampMsg, TradeMsg, TradingActionMsg,
    },
};

/// An owned record of any ITCH message schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordEnum {
    /// A seconds timestamp message.
    Timestamp(TimestampMsg),
    /// A system event message.
    SystemEvent(SystemEventMsg),
    /// A stock directory message.
    StockDirectory(StockDirectoryMsg),
    /// A stock trading action message.
    TradingAction(TradingActionMsg),
    /// A Reg SHO short sale price test message.
    RegSho(RegShoMsg),
    /// A market participant position message.
    MarketParticipantPosition(MarketParticipantPosMsg),
    /// A broken trade message.
    BrokenTrade(BrokenTradeMsg),
    /// A net order imbalance indicator message.
    Imbalance(ImbalanceMsg),
    /// A retail price improvement indicator message.
    RetailPriceImprovement(RetailPriceImprovementMsg),
    /// An add order message.
    AddOrder(AddOrderMsg),
    /// An add order with MPID attribution message.
    AddOrderMpid(AddOrderMpidMsg),
    /// An order executed message.
    OrderExecuted(OrderExecutedMsg),
    /// An order executed with price message.
    OrderExecutedWithPrice(OrderExecutedWithPriceMsg),
    /// An order cancel message.
    OrderCancel(OrderCancelMsg),
    /// An order delete message.
    OrderDelete(OrderDeleteMsg),
    /// An order replace message.
    OrderReplace(OrderReplaceMsg),
    /// A non-cross trade message.
    Trade(TradeMsg),
    /// A cross trade message.
    CrossTrade(CrossTradeMsg),
}

impl RecordEnum {
    /// Returns the [`MessageType`] of the contained record.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Timestamp(_) => MessageType::Timestamp,
            Self::SystemEvent(_) => MessageType::SystemEvent,
            Self::StockDirectory(_) => MessageType::StockDirectory,
            Self::TradingAction(_) => MessageType::TradingAction,
            Self::RegSho(_) => MessageType::RegSho,
            Self::MarketParticipantPosition(_) => MessageType::MarketParticipantPosition,
            Self::BrokenTrade(_) => MessageType::BrokenTrade,
            Self::Imbalance(_) => MessageType::Imbalance,
            Self::RetailPriceImprovement(_) => MessageType::RetailPriceImprovement,
            Self::AddOrder(_) => MessageType::AddOrder,
            Self::AddOrderMpid(_) => MessageType::AddOrderMpid,
            Self::OrderExecuted(_) => MessageType::OrderExecuted,
            Self::OrderExecutedWithPrice(_) => MessageType::OrderExecutedWithPrice,
            Self::OrderCancel(_) => MessageType::OrderCancel,
            Self::OrderDelete(_) => MessageType::OrderDelete,
            Self::OrderReplace(_) => MessageType::OrderReplace,
            Self::Trade(_) => MessageType::Trade,
            Self::CrossTrade(_) => MessageType::CrossTrade,
        }
    }
}

macro_rules! from_record {
    ($rec:ident, $variant:ident) => {
        impl From<$rec> for RecordEnum {
            fn from(rec: $rec) -> Self {
                Self::$variant(rec)
            }
        }
    };
}

from_record!(TimestampMsg, Timestamp);
from_record!(SystemEventMsg, SystemEvent);
from_record!(StockDirectoryMsg, StockDirectory);
from_record!(TradingActionMsg, TradingAction);
from_record!(RegShoMsg, RegSho);
from_record!(MarketParticipantPosMsg, MarketParticipantPosition);
from_record!(BrokenTradeMsg, BrokenTrade);
from_record!(ImbalanceMsg, Imbalance);
from_record!(RetailPriceImprovementMsg, RetailPriceImprovement);
from_record!(AddOrderMsg, AddOrder);
from_record!(AddOrderMpidMsg, AddOrderMpid);
from_record!(OrderExecutedMsg, OrderExecuted);
from_record!(OrderExecutedWithPriceMsg, OrderExecutedWithPrice);
from_record!(OrderCancelMsg, OrderCancel);
from_record!(OrderDeleteMsg, OrderDelete);
from_record!(OrderReplaceMsg, OrderReplace);
from_record!(TradeMsg, Trade);
from_record!(CrossTradeMsg, CrossTrade);
