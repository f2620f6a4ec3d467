//! Canonical, model-neutral parameter names and the TR-069 metadata each
//! device model binds them to.

/// Canonical parameter identity. Indexed families carry their instance
/// index as a field rather than being baked into a formatted path string;
/// the wire path is rendered only at emission time (see
/// [`super::DataModel::resolve_path`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterName {
    Device,
    FapService,
    MmeStatus,
    GpsLat,
    GpsLong,
    SwVersion,
    SerialNumber,
    DuplexModeCapability,
    BandCapability,
    Earfcndl,
    Earfcnul,
    Pci,
    DlBandwidth,
    UlBandwidth,
    SubframeAssignment,
    SpecialSubframePattern,
    CellId,
    AdminState,
    OpState,
    RfTxStatus,
    CellBarred,
    MmeIp,
    MmePort,
    Tac,
    IpSecEnable,
    PeriodicInformEnable,
    PeriodicInformInterval,
    PerfMgmtEnable,
    PerfMgmtUploadInterval,
    PerfMgmtUploadUrl,

    DownloadUrl,
    DownloadUser,
    DownloadPassword,
    DownloadFilename,
    DownloadFilesize,
    DownloadMd5,

    NumPlmns,
    NumLteNeighborFreq,
    NumLteNeighborCell,

    PlmnN(u8),
    PlmnNCellReserved(u8),
    PlmnNEnable(u8),
    PlmnNPrimary(u8),
    PlmnNPlmnid(u8),

    NeighborFreqListN(u8),
    NeighborFreqListNEarfcn(u8),
    NeighborFreqListNQRxLevMinSib5(u8),
    NeighborFreqListNQOffsetFreq(u8),
    NeighborFreqListNTReselectionEutra(u8),
    NeighborFreqListNCellReselectionPriority(u8),
    NeighborFreqListNThreshXHigh(u8),
    NeighborFreqListNThreshXLow(u8),
    NeighborFreqListNPMax(u8),
    NeighborFreqListNTReselectionEutraSfMedium(u8),
    NeighborFreqListNEnable(u8),

    NeighborCellListN(u8),
    NeighborCellListNCid(u8),
    NeighborCellListNPlmnid(u8),
    NeighborCellListNEutraCarrierArfcn(u8),
    NeighborCellListNPhyCellId(u8),
    NeighborCellListNTac(u8),
    NeighborCellListNQOffset(u8),
    NeighborCellListNCio(u8),
    NeighborCellListNEnable(u8),

    GpsConnected,
    PtpConnected,
    MmeConnected,
    RemStatus,

    SasEnabled,
    SasFccId,
    SasUserId,
    SasRadioEnable,
    Band,
    PowerSpectralDensity,
}

impl ParameterName {
    /// Rebinds an indexed-family root to a different instance index,
    /// used after an AddObject response assigns the authoritative
    /// instance number. Non-root or unindexed names are returned unchanged.
    pub fn renumbered(self, new_index: u8) -> ParameterName {
        match self {
            ParameterName::PlmnN(_) => ParameterName::PlmnN(new_index),
            ParameterName::NeighborFreqListN(_) => ParameterName::NeighborFreqListN(new_index),
            ParameterName::NeighborCellListN(_) => ParameterName::NeighborCellListN(new_index),
            other => other,
        }
    }
}

/// TR-069 wire type of a parameter's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrParameterType {
    Object,
    Boolean,
    Int,
    UnsignedInt,
    String,
}

/// A parameter's wire path, or the sentinel for parameters that never
/// cross the wire (the `DOWNLOAD_*` family, which only live in the
/// configuration store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamPath {
    Path(String),
    /// `InvalidTrParamPath` in the originating system: the diff engine
    /// must skip parameters bound to this sentinel for every wire
    /// operation.
    Invalid,
}

impl ParamPath {
    pub fn as_wire_path(&self) -> Option<&str> {
        match self {
            ParamPath::Path(p) => Some(p.as_str()),
            ParamPath::Invalid => None,
        }
    }
}

/// Static metadata a data model binds to a [`ParameterName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrParam {
    pub path: ParamPath,
    pub is_invasive: bool,
    pub param_type: TrParameterType,
    pub is_optional: bool,
}

impl TrParam {
    pub fn new(path: impl Into<String>, is_invasive: bool, param_type: TrParameterType, is_optional: bool) -> Self {
        Self {
            path: ParamPath::Path(path.into()),
            is_invasive,
            param_type,
            is_optional,
        }
    }

    pub fn synthetic(param_type: TrParameterType) -> Self {
        Self {
            path: ParamPath::Invalid,
            is_invasive: false,
            param_type,
            is_optional: false,
        }
    }
}
