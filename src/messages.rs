//! Parsed TR-069 session message shapes exchanged between the transport
//! layer (out of scope here) and the provisioning core.

use serde::{Deserialize, Serialize};

/// TR-069 fault codes, numbered per the CWMP specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tr069FaultCode {
    MethodNotSupported = 9000,
    RequestDenied = 9001,
    InternalError = 9002,
    InvalidArguments = 9003,
    ResourcesExceeded = 9004,
    InvalidParameterName = 9005,
    InvalidParameterType = 9006,
    InvalidParameterValue = 9007,
    AttemptToSetNonWritableParameter = 9008,
    NotificationRequestRejected = 9009,
    DownloadFailure = 9010,
    UploadFailure = 9011,
    FileTransferServerAuthenticationFailure = 9012,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterValueStruct {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceIdStruct {
    pub manufacturer: String,
    pub oui: String,
    pub product_class: String,
    pub serial_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventStruct {
    pub event_code: String,
    pub command_key: String,
}

impl EventStruct {
    pub fn new(event_code: impl Into<String>) -> Self {
        Self {
            event_code: event_code.into(),
            command_key: String::new(),
        }
    }
}

pub const EVENT_BOOTSTRAP: &str = "0 BOOTSTRAP";
pub const EVENT_BOOT: &str = "1 BOOT";
pub const EVENT_PERIODIC: &str = "2 PERIODIC";
pub const EVENT_VALUE_CHANGE: &str = "4 VALUE CHANGE";
pub const EVENT_TRANSFER_COMPLETE: &str = "7 TRANSFER COMPLETE";

/// A message received from a device during a session.
#[derive(Debug, Clone)]
pub enum InboundMessage {
    Inform {
        device_id: DeviceIdStruct,
        events: Vec<EventStruct>,
        parameters: Vec<ParameterValueStruct>,
    },
    GetRpcMethodsResponse,
    GetParameterValuesResponse(Vec<ParameterValueStruct>),
    SetParameterValuesResponse { status: i32 },
    AddObjectResponse { status: i32, instance_number: u32 },
    DeleteObjectResponse { status: i32 },
    DownloadResponse,
    RebootResponse,
    FactoryResetResponse,
    Fault { code: Tr069FaultCode, detail: String },
    /// An empty envelope, sent to close out a round trip.
    DummyInput,
}

/// A message emitted by the core, to be serialized by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    GetRpcMethods,
    GetParameterValues(Vec<String>),
    SetParameterValues(Vec<ParameterValueStruct>),
    AddObject(String),
    DeleteObject(String),
    Reboot,
    FactoryReset,
    Download {
        url: String,
        user_name: String,
        password: String,
        file_type: String,
        file_size: u64,
        target_file_name: String,
        md5: String,
    },
    /// Empty envelope, closing the current HTTP round trip without asking
    /// for anything further this tick.
    DummyInput,
}
