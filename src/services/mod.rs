//! Control-RPC surface built on top of the session core.

pub mod control;

pub use control::{ControlService, EnodebStatus, ServiceStatus};
