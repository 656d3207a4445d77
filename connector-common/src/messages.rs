// connector-common/src/messages.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::security::SecurityId;

/// Market data feeds the engine can request from a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketDataKind {
    Level1,
    MarketDepth,
    Trades,
    CandleTimeFrame,
    OrderLog,
    News,
}

/// Subscribe/unsubscribe intent for one feed on one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataRequest {
    pub transaction_id: u64,
    /// Venue-native contract id of the instrument.
    pub security_native: i64,
    pub kind: MarketDataKind,
    pub subscribe: bool,
    /// Start of a historical range; `None` means live data only.
    pub from: Option<DateTime<Utc>>,
}

/// Commands the engine sends into a connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IncomingMessage {
    Reset,
    Connect,
    Disconnect,
    SecurityLookup { transaction_id: u64 },
    PortfolioLookup { transaction_id: u64 },
    MarketData(MarketDataRequest),
    OrderRegister,
    OrderCancel,
    OrderReplace,
    OrderGroupCancel,
    Portfolio,
}

/// One instrument from a security enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityMessage {
    pub security_id: SecurityId,
    pub name: String,
    pub class: String,
    pub price_step: Decimal,
    pub decimals: i32,
    pub multiplier: i32,
    pub expiry: Option<DateTime<Utc>>,
    /// Transaction id of the lookup this row answers; 0 for unsolicited rows.
    pub original_transaction_id: u64,
}

/// One account from a portfolio enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMessage {
    pub name: String,
    pub board: String,
}

/// An unsolicited venue trade. Ticks are streaming data and carry no
/// correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickMessage {
    pub security_native: i64,
    pub trade_id: i64,
    pub price: Decimal,
    pub volume: Decimal,
    pub server_time: DateTime<Utc>,
}

/// Normalized messages a connector emits back to the engine.
///
/// Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutgoingMessage {
    ResetAck,
    ConnectAck,
    Security(SecurityMessage),
    Portfolio(PortfolioMessage),
    PortfolioLookupResult { original_transaction_id: u64 },
    Tick(TickMessage),
    MarketDataNotSupported { original_transaction_id: u64 },
    Error { message: String },
}
