//! Session-facing core: device-model dispatch and the manager that owns
//! one [`DeviceHandler`](crate::session::DeviceHandler) per connected serial.

pub mod registry;
