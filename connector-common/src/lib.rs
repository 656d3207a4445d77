// connector-common/src/lib.rs
// Venue-agnostic types shared between the trading engine and connectors.

pub mod messages;
pub mod security;

pub use messages::{
    IncomingMessage, MarketDataKind, MarketDataRequest, OutgoingMessage, PortfolioMessage,
    SecurityMessage, TickMessage,
};
pub use security::SecurityId;
