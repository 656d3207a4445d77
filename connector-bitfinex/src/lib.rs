// connector-bitfinex/src/lib.rs
// BitFinex venue connector: translates the vendor socket protocol into the
// engine's normalized message stream and back.

pub mod adapter;
pub mod convert;
pub mod errors;
pub mod settings;
pub mod transport;

pub use adapter::{spawn, AdapterHandle, BitfinexAdapter, OutgoingReceiver};
pub use errors::{AdapterError, ConvertError, TransportError};
pub use settings::AdapterSettings;
pub use transport::{
    BitfinexSocket, EventSender, PortfolioRow, SocketFactory, SymbolRow, TickRow, TransportEvent,
};
