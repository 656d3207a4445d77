// errors.rs

use thiserror::Error;

/// Failures at the vendor socket boundary.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Socket is not connected")]
    NotConnected,
}

/// Failures normalizing vendor field values.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Value {0} is not representable as a decimal")]
    NonFiniteDecimal(f64),

    #[error("Invalid trade id '{0}'")]
    InvalidTradeId(String),
}

/// Unrecoverable adapter faults.
///
/// Operational failures are reported to the engine as emitted `Error`
/// messages; only programming-contract violations and a closed engine
/// channel surface here.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Contract violation: {0}")]
    ContractViolation(&'static str),

    #[error("Engine channel closed")]
    ChannelClosed,
}
