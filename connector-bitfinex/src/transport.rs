// transport.rs
// Boundary to the vendor socket library. The socket itself is a black box;
// the adapter only sees these calls and the events pushed back through the
// event channel.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::mpsc;

use crate::errors::TransportError;

/// Imperative side of the vendor socket.
///
/// Every call is fire-and-forget at the protocol level: results arrive later
/// as [`TransportEvent`]s on the channel the socket was created with.
#[async_trait]
pub trait BitfinexSocket: Send {
    async fn connect(&mut self, address: &str, port: u16) -> Result<(), TransportError>;
    async fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Start a full symbol enumeration; rows arrive as `Symbol` events.
    async fn get_symbols(&mut self) -> Result<(), TransportError>;

    /// Start a portfolio enumeration; rows arrive as `Portfolio` events.
    async fn get_portfolio_list(&mut self) -> Result<(), TransportError>;

    async fn listen_ticks(&mut self, contract_id: i64) -> Result<(), TransportError>;
    async fn cancel_ticks(&mut self, contract_id: i64) -> Result<(), TransportError>;
}

/// One row of a symbol enumeration.
#[derive(Debug, Clone)]
pub struct SymbolRow {
    pub row: u32,
    pub row_count: u32,
    pub contract_id: i64,
    pub name: String,
    pub sec_code: String,
    pub sec_class: String,
    pub isin: String,
    pub board: String,
    pub decimals: i32,
    pub lot_size: i32,
    pub step_price: f64,
    pub price_step: f64,
    /// Venue-local expiry; the OLE zero date means "no expiry".
    pub expiry_date: NaiveDateTime,
    pub days_before_expiry: f64,
    pub strike: f64,
}

/// One row of a portfolio enumeration.
#[derive(Debug, Clone)]
pub struct PortfolioRow {
    pub row: u32,
    pub row_count: u32,
    pub name: String,
    pub exchange: String,
}

/// One venue trade.
#[derive(Debug, Clone)]
pub struct TickRow {
    pub contract_id: i64,
    /// Venue-local trade time.
    pub time: NaiveDateTime,
    pub price: f64,
    pub volume: f64,
    pub trade_id: String,
}

/// Asynchronous callbacks fired by the socket.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Connected,
    Symbol(SymbolRow),
    Portfolio(PortfolioRow),
    Tick(TickRow),
}

pub type EventSender = mpsc::UnboundedSender<TransportEvent>;

/// Creates a fresh socket, wired to the adapter's event channel. Invoked
/// once per `Connect` command.
pub type SocketFactory = Box<dyn Fn(EventSender) -> Box<dyn BitfinexSocket> + Send>;
