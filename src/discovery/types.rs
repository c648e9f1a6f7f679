use crate::sys::{CecLogicalAddress, CecOpcode};
use bitflags::bitflags;

/// 16-bit topology coordinate (a.b.c.d packed into two bytes).
///
/// No physical address is valid on its own; a device reports its own via
/// [`CecOpcode::ReportPhysicalAddr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicalAddress(pub u16);

impl PhysicalAddress {
    /// Sentinel used before a device's physical address is known.
    pub const INVALID: PhysicalAddress = PhysicalAddress(0xffff);

    /// Parse the two-byte network-order payload of a `ReportPhysicalAddr` message.
    pub fn from_be_bytes(hi: u8, lo: u8) -> Self {
        PhysicalAddress(u16::from_be_bytes([hi, lo]))
    }
}

impl Default for PhysicalAddress {
    fn default() -> Self {
        PhysicalAddress::INVALID
    }
}

/// Small integer identifying the HDMI input port a device hangs off of.
///
/// Only meaningful when the local device is a TV or audio system; resolved
/// by [`crate::discovery::local_device::LocalDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortId(pub i32);

impl PortId {
    pub const INVALID: PortId = PortId(-1);
}

impl Default for PortId {
    fn default() -> Self {
        PortId::INVALID
    }
}

/// The third byte of a `ReportPhysicalAddr` payload.
///
/// Kept as a raw code rather than [`crate::CecPrimDevType`] because Discovery
/// must inventory device types it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceType(pub u8);

impl DeviceType {
    pub const INACTIVE: DeviceType = DeviceType(0xff);
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::INACTIVE
    }
}

/// 24-bit IEEE OUI-derived vendor identifier, as reported by `DeviceVendorId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VendorId(pub u32);

impl VendorId {
    pub const UNKNOWN: VendorId = VendorId(0x00ff_ffff);

    /// Parse the three-byte payload of a `DeviceVendorId` message.
    pub fn from_bytes(b: [u8; 3]) -> Self {
        VendorId(u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }
}

impl Default for VendorId {
    fn default() -> Self {
        VendorId::UNKNOWN
    }
}

/// Wire-independent snapshot of a finished [`crate::discovery::record::DeviceRecord`].
///
/// Produced once per surviving device at wrap-up (§4.6) and handed to the
/// completion callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub logical_address: CecLogicalAddress,
    pub physical_address: PhysicalAddress,
    pub port_id: PortId,
    pub device_type: DeviceType,
    pub vendor_id: VendorId,
    pub display_name: String,
}

/// The wire-independent view of a received CEC message that Discovery acts on.
///
/// `opcode` is `None` for a zero-length poll acknowledgement; Discovery never
/// looks at transport-internal fields (timestamps, tx/rx status) beyond this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    pub source: CecLogicalAddress,
    pub opcode: Option<CecOpcode>,
    pub params: Vec<u8>,
}

impl InboundFrame {
    pub fn new(source: CecLogicalAddress, opcode: CecOpcode, params: Vec<u8>) -> Self {
        InboundFrame {
            source,
            opcode: Some(opcode),
            params,
        }
    }

    /// `true` if this is a Feature Abort whose rejected-opcode operand matches `target`.
    pub fn is_feature_abort_of(&self, target: CecOpcode) -> bool {
        self.opcode == Some(CecOpcode::FeatureAbort)
            && self.params.first().copied() == Some(target.into())
    }

    /// Project a received [`crate::CecMsg`] down to the fields Discovery
    /// cares about. An unrecognized opcode byte is treated the same as a
    /// poll (`opcode: None`) since Discovery has nothing to match it against.
    pub fn from_cec_msg(msg: &crate::CecMsg) -> Self {
        InboundFrame {
            source: msg.initiator(),
            opcode: msg.opcode().and_then(Result::ok),
            params: msg.parameters().to_vec(),
        }
    }
}

bitflags! {
    /// Flags passed to [`crate::discovery::bus::BusGateway::poll_devices`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PollScope: u8 {
        /// Sweep logical addresses from 15 down to 0 instead of 0 up to 15.
        const REVERSE_ORDER = 0b01;
        /// Skip the local device's own logical address during the sweep.
        const REMOTES_ONLY  = 0b10;
    }
}

/// Addresses in `[ADDR_TV, ADDR_UNREGISTERED)` are eligible for per-stage queries.
pub const ADDR_TV: u8 = 0;
/// First address outside the valid-for-query range; also the broadcast address.
pub const ADDR_UNREGISTERED: u8 = 15;

/// Default number of retries for the initial bus poll.
pub const DEVICE_POLLING_RETRY: u8 = 3;
/// Default number of retries for a single per-device, per-stage query.
pub const TIMEOUT_RETRY: u8 = 5;
/// Default per-query timeout.
pub const TIMEOUT_MS: u64 = 2000;

pub(crate) fn is_valid_for_query(addr: CecLogicalAddress) -> bool {
    addr != CecLogicalAddress::UnregisteredBroadcast
}

/// The default OSD name used when no device-type-specific or vendor-reported
/// name is available.
pub fn default_name_for_logical_address(addr: CecLogicalAddress) -> String {
    format!("{addr:?}")
}

/// The default OSD name assigned right after a physical-address report, before
/// the OSD-name stage has run.
pub fn default_name_for_device_type(device_type: DeviceType) -> String {
    format!("device-{:#04x}", device_type.0)
}
