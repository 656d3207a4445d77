// adapter.rs
// Request/response correlation and subscription dispatch between the
// normalized engine interface and the vendor socket.

use connector_common::{
    IncomingMessage, MarketDataKind, MarketDataRequest, OutgoingMessage, PortfolioMessage,
    SecurityId, SecurityMessage, TickMessage,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::convert;
use crate::errors::AdapterError;
use crate::settings::AdapterSettings;
use crate::transport::{
    BitfinexSocket, PortfolioRow, SocketFactory, SymbolRow, TickRow, TransportEvent,
};

pub type OutgoingReceiver = mpsc::UnboundedReceiver<OutgoingMessage>;

/// Correlation and lifecycle state for one engine-facing session.
///
/// At most one security lookup and one portfolio lookup may be outstanding
/// at a time; the socket handle exists exactly between a `Connect` command
/// and the next `Disconnect`/`Reset`. All methods run on the single task
/// that owns the adapter, so commands and transport events never interleave.
pub struct BitfinexAdapter {
    settings: AdapterSettings,
    factory: SocketFactory,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
    out_tx: mpsc::UnboundedSender<OutgoingMessage>,
    socket: Option<Box<dyn BitfinexSocket>>,
    lookup_securities_id: Option<u64>,
    lookup_portfolios_id: Option<u64>,
}

impl BitfinexAdapter {
    pub fn new(
        settings: AdapterSettings,
        factory: SocketFactory,
        event_tx: mpsc::UnboundedSender<TransportEvent>,
        out_tx: mpsc::UnboundedSender<OutgoingMessage>,
    ) -> Self {
        Self {
            settings,
            factory,
            event_tx,
            out_tx,
            socket: None,
            lookup_securities_id: None,
            lookup_portfolios_id: None,
        }
    }

    fn emit(&self, msg: OutgoingMessage) -> Result<(), AdapterError> {
        self.out_tx.send(msg).map_err(|_| AdapterError::ChannelClosed)
    }

    fn emit_error(&self, message: String) -> Result<(), AdapterError> {
        warn!(%message, "reporting error to engine");
        self.emit(OutgoingMessage::Error { message })
    }

    /// Dispatch one engine command.
    ///
    /// Only contract violations and a closed engine channel return `Err`;
    /// operational failures are emitted as `Error` messages and the call
    /// still succeeds.
    pub async fn process_command(&mut self, msg: IncomingMessage) -> Result<(), AdapterError> {
        match msg {
            IncomingMessage::Reset => self.process_reset().await,
            IncomingMessage::Connect => self.process_connect().await,
            IncomingMessage::Disconnect => self.process_disconnect().await,
            IncomingMessage::SecurityLookup { transaction_id } => {
                self.process_security_lookup(transaction_id).await
            }
            IncomingMessage::PortfolioLookup { transaction_id } => {
                self.process_portfolio_lookup(transaction_id).await
            }
            IncomingMessage::MarketData(request) => self.process_market_data(request).await,
            stub @ (IncomingMessage::OrderRegister
            | IncomingMessage::OrderCancel
            | IncomingMessage::OrderReplace
            | IncomingMessage::OrderGroupCancel
            | IncomingMessage::Portfolio) => {
                // Order routing and position reporting are not wired up.
                debug!(command = ?stub, "command accepted but not implemented");
                Ok(())
            }
        }
    }

    /// Clear all pending state, tear the socket down best-effort and
    /// acknowledge. The ack is emitted unconditionally, teardown failures
    /// are reported but never abort the reset.
    async fn process_reset(&mut self) -> Result<(), AdapterError> {
        self.lookup_securities_id = None;
        self.lookup_portfolios_id = None;

        if let Some(mut socket) = self.socket.take() {
            if let Err(e) = socket.disconnect().await {
                self.emit_error(format!("Teardown failed during reset: {e}"))?;
            }
        }

        info!("adapter reset");
        self.emit(OutgoingMessage::ResetAck)
    }

    async fn process_connect(&mut self) -> Result<(), AdapterError> {
        if self.socket.is_some() {
            return Err(AdapterError::ContractViolation(
                "Connect received while a socket already exists; Reset or Disconnect first",
            ));
        }

        let mut socket = (self.factory)(self.event_tx.clone());
        info!(address = %self.settings.address, port = self.settings.port, "connecting");

        match socket.connect(&self.settings.address, self.settings.port).await {
            Ok(()) => {
                // ConnectAck is deferred until the Connected event fires.
                self.socket = Some(socket);
                Ok(())
            }
            Err(e) => self.emit_error(format!("Connect failed: {e}")),
        }
    }

    async fn process_disconnect(&mut self) -> Result<(), AdapterError> {
        let socket = self.socket.as_mut().ok_or(AdapterError::ContractViolation(
            "Disconnect received while no socket exists",
        ))?;

        info!("disconnecting");
        if let Err(e) = socket.disconnect().await {
            self.emit_error(format!("Disconnect failed: {e}"))?;
        }
        self.socket = None;

        // The observed protocol never acknowledges a disconnect, so none is
        // emitted here.
        Ok(())
    }

    async fn process_security_lookup(&mut self, transaction_id: u64) -> Result<(), AdapterError> {
        if let Some(pending) = self.lookup_securities_id {
            // The in-flight enumeration keeps running; only the new request
            // is rejected.
            return self.emit_error(format!(
                "Security lookup {transaction_id} rejected: lookup {pending} is still in flight"
            ));
        }

        let Some(socket) = self.socket.as_mut() else {
            return self.emit_error(format!(
                "Security lookup {transaction_id} rejected: not connected"
            ));
        };

        self.lookup_securities_id = Some(transaction_id);
        if let Err(e) = socket.get_symbols().await {
            self.lookup_securities_id = None;
            return self.emit_error(format!("Symbol enumeration failed: {e}"));
        }

        debug!(transaction_id, "security lookup started");
        Ok(())
    }

    async fn process_portfolio_lookup(&mut self, transaction_id: u64) -> Result<(), AdapterError> {
        if let Some(pending) = self.lookup_portfolios_id {
            return self.emit_error(format!(
                "Portfolio lookup {transaction_id} rejected: lookup {pending} is still in flight"
            ));
        }

        let Some(socket) = self.socket.as_mut() else {
            return self.emit_error(format!(
                "Portfolio lookup {transaction_id} rejected: not connected"
            ));
        };

        self.lookup_portfolios_id = Some(transaction_id);
        if let Err(e) = socket.get_portfolio_list().await {
            self.lookup_portfolios_id = None;
            return self.emit_error(format!("Portfolio enumeration failed: {e}"));
        }

        debug!(transaction_id, "portfolio lookup started");
        Ok(())
    }

    async fn process_market_data(&mut self, request: MarketDataRequest) -> Result<(), AdapterError> {
        match request.kind {
            MarketDataKind::Trades => {
                if request.from.is_some() {
                    // Historical trade ranges are not implemented.
                    debug!(
                        transaction_id = request.transaction_id,
                        "historical trades requested; ignored"
                    );
                    return Ok(());
                }

                let Some(socket) = self.socket.as_mut() else {
                    return self.emit_error(format!(
                        "Market data request {} rejected: not connected",
                        request.transaction_id
                    ));
                };

                let result = if request.subscribe {
                    socket.listen_ticks(request.security_native).await
                } else {
                    socket.cancel_ticks(request.security_native).await
                };
                if let Err(e) = result {
                    return self.emit_error(format!("Tick subscription change failed: {e}"));
                }

                debug!(
                    contract_id = request.security_native,
                    subscribe = request.subscribe,
                    "tick subscription updated"
                );
                Ok(())
            }
            MarketDataKind::Level1
            | MarketDataKind::MarketDepth
            | MarketDataKind::CandleTimeFrame => {
                // Recognized kinds without an implementation; deliberately
                // distinct from the unsupported fallthrough below.
                debug!(kind = ?request.kind, "market data kind not implemented; ignored");
                Ok(())
            }
            _ => self.emit(OutgoingMessage::MarketDataNotSupported {
                original_transaction_id: request.transaction_id,
            }),
        }
    }

    /// Translate one vendor callback into normalized messages.
    pub fn process_event(&mut self, event: TransportEvent) -> Result<(), AdapterError> {
        match event {
            TransportEvent::Connected => {
                info!("transport connected");
                self.emit(OutgoingMessage::ConnectAck)
            }
            TransportEvent::Symbol(row) => self.process_symbol(row),
            TransportEvent::Portfolio(row) => self.process_portfolio_row(row),
            TransportEvent::Tick(row) => self.process_tick(row),
        }
    }

    fn process_symbol(&mut self, row: SymbolRow) -> Result<(), AdapterError> {
        let price_step = match convert::to_decimal(row.price_step) {
            Ok(v) => v,
            Err(e) => {
                return self.emit_error(format!("Symbol row {} dropped: {e}", row.contract_id))
            }
        };

        let code = if row.sec_code.is_empty() {
            row.contract_id.to_string()
        } else {
            row.sec_code
        };
        let class = if row.sec_class.is_empty() {
            row.board.clone()
        } else {
            row.sec_class
        };

        // Each row stands alone; there is no terminal message for security
        // enumerations and the slot stays pending until Reset.
        self.emit(OutgoingMessage::Security(SecurityMessage {
            security_id: SecurityId {
                code,
                board: row.board,
                native: row.contract_id,
                isin: row.isin,
            },
            name: row.name,
            class,
            price_step,
            decimals: row.decimals,
            multiplier: row.lot_size,
            expiry: convert::expiry_from_vendor(row.expiry_date),
            original_transaction_id: self.lookup_securities_id.unwrap_or_default(),
        }))
    }

    fn process_portfolio_row(&mut self, row: PortfolioRow) -> Result<(), AdapterError> {
        self.emit(OutgoingMessage::Portfolio(PortfolioMessage {
            name: row.name,
            board: row.exchange,
        }))?;

        if row.row + 1 < row.row_count {
            return Ok(());
        }

        // Last row: close out the lookup and free the slot.
        let original_transaction_id = self.lookup_portfolios_id.take().unwrap_or_default();
        debug!(original_transaction_id, "portfolio lookup finished");
        self.emit(OutgoingMessage::PortfolioLookupResult {
            original_transaction_id,
        })
    }

    fn process_tick(&mut self, row: TickRow) -> Result<(), AdapterError> {
        let price = match convert::to_decimal(row.price) {
            Ok(v) => v,
            Err(e) => return self.emit_error(format!("Tick for {} dropped: {e}", row.contract_id)),
        };
        let volume = match convert::to_decimal(row.volume) {
            Ok(v) => v,
            Err(e) => return self.emit_error(format!("Tick for {} dropped: {e}", row.contract_id)),
        };
        let trade_id = match convert::parse_trade_id(&row.trade_id) {
            Ok(v) => v,
            Err(e) => return self.emit_error(format!("Tick for {} dropped: {e}", row.contract_id)),
        };

        self.emit(OutgoingMessage::Tick(TickMessage {
            security_native: row.contract_id,
            trade_id,
            price,
            volume,
            server_time: convert::venue_time_to_utc(row.time),
        }))
    }
}

/// Handle for feeding engine commands into a spawned adapter.
#[derive(Clone)]
pub struct AdapterHandle {
    cmd_tx: mpsc::UnboundedSender<IncomingMessage>,
}

impl AdapterHandle {
    pub fn send(&self, msg: IncomingMessage) -> Result<(), AdapterError> {
        self.cmd_tx.send(msg).map_err(|_| AdapterError::ChannelClosed)
    }
}

/// Spawn the adapter event loop.
///
/// All session state lives inside the spawned task; engine commands and
/// transport events are serialized through it, which is what the
/// single-outstanding-lookup slots rely on. A fatal fault logs and
/// terminates the task.
pub fn spawn(settings: AdapterSettings, factory: SocketFactory) -> (AdapterHandle, OutgoingReceiver) {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();

    let mut adapter = BitfinexAdapter::new(settings, factory, event_tx, out_tx);

    tokio::spawn(async move {
        loop {
            let step = tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => adapter.process_command(cmd).await,
                    None => break,
                },
                event = event_rx.recv() => match event {
                    Some(event) => adapter.process_event(event),
                    None => break,
                },
            };

            if let Err(e) = step {
                error!(error = %e, "adapter fault, terminating");
                break;
            }
        }
    });

    (AdapterHandle { cmd_tx }, out_rx)
}
