//! Error handling for the eNodeB auto-configuration server

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A device-reported Fault message, or a non-zero status in a
    /// Set/Add/DeleteObject response.
    #[error("protocol fault from {serial}: {detail}")]
    ProtocolFault { serial: String, detail: String },

    /// A data-model or configuration-store invariant was violated: unknown
    /// parameter, out-of-range PSD, missing object, wrong RPC argument type.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// The transport reported the device as disconnected or timed out.
    #[error("transport error for {serial}: {detail}")]
    TransportError { serial: String, detail: String },

    /// Inform arrived with no registered device-model match for its
    /// (OUI, hardware version, software version) triple.
    #[error("unknown device: oui={oui} hw={hw} sw={sw}")]
    UnknownDevice { oui: String, hw: String, sw: String },

    /// No handler is registered for the requested serial number.
    #[error("no handler for serial {0}")]
    UnknownSerial(String),

    /// The domain proxy (SAS) client could not be reached or returned no
    /// usable CBSD state.
    #[error("domain proxy unavailable: {0}")]
    DomainProxyUnavailable(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn protocol_fault<S: Into<String>, D: Into<String>>(serial: S, detail: D) -> Self {
        Self::ProtocolFault {
            serial: serial.into(),
            detail: detail.into(),
        }
    }

    pub fn configuration_error<S: Into<String>>(msg: S) -> Self {
        Self::ConfigurationError(msg.into())
    }

    pub fn transport_error<S: Into<String>, D: Into<String>>(serial: S, detail: D) -> Self {
        Self::TransportError {
            serial: serial.into(),
            detail: detail.into(),
        }
    }

    pub fn unknown_device<S: Into<String>>(oui: S, hw: S, sw: S) -> Self {
        Self::UnknownDevice {
            oui: oui.into(),
            hw: hw.into(),
            sw: sw.into(),
        }
    }

    pub fn domain_proxy_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::DomainProxyUnavailable(msg.into())
    }

    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Non-fatal errors keep the owning handler alive, idle until the next
    /// Inform. Fatal errors invalidate the handler's identity outright.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnknownDevice { .. } | Error::UnknownSerial(_))
    }
}
