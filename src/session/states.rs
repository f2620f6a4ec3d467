//! State labels and the invasive-parameter application policy that
//! distinguishes QAFA/QAFB from QRTB handlers.
//!
//! Grounded on `state_machines/enb_acs_states.py` (the state graph) and
//! `state_machines/acs_state_utils.py` (`does_inform_have_event`).

use crate::data_model::ParameterName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateLabel {
    WaitInform,
    WaitEmpty,
    GetTransientParams,
    WaitGetTransientParams,
    GetParams,
    WaitGetParams,
    GetObjParams,
    WaitGetObjParams,
    DeleteObjs,
    WaitDeleteObjs,
    AddObjs,
    WaitAddObjs,
    SetParams,
    WaitSetParams,
    CheckGetParams,
    CheckWaitGetParams,
    EndSession,
    NotifyDp,
    Reboot,
    WaitReboot,
    WaitPostRebootInform,
    WaitQueuedEventsPostReboot,
    WaitInformPostReboot,
    WaitEmptyPostReboot,
    Download,
    WaitDownload,
    WaitInformPostDownload,
    WaitEmptyPostDownload,
    FactoryReset,
    WaitFactoryReset,
    UnexpectedFault,
}

/// How invasive parameter changes (those with `is_invasive = true`) take
/// effect on the device once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvasiveApplyPolicy {
    /// The device applies changes without a reboot; verification happens
    /// in `check_get_params` on the very next round trip.
    ApplyInPlace,
    /// The device only applies invasive changes after a reboot; the
    /// engine must drive the manual reboot branch itself.
    ApplyViaReboot,
}

/// Parameters read at the start of every session, before any diffing
/// happens: read-only status plus whatever the data model marks
/// synthetic-free and invariant across the session.
pub fn transient_param_names() -> &'static [ParameterName] {
    &[
        ParameterName::GpsConnected,
        ParameterName::PtpConnected,
        ParameterName::MmeConnected,
        ParameterName::RemStatus,
        ParameterName::OpState,
        ParameterName::RfTxStatus,
        ParameterName::GpsLat,
        ParameterName::GpsLong,
    ]
}

pub fn inform_has_event(events: &[crate::messages::EventStruct], code: &str) -> bool {
    events.iter().any(|e| e.event_code == code)
}
