use super::types::{DeviceInfo, DeviceType, PhysicalAddress, PortId, VendorId};
use crate::sys::CecLogicalAddress;

/// C4: one in-progress inventory entry per acknowledged logical address (§3).
///
/// Created only in the Polling→PhysicalAddress transition; never inserted or
/// reordered afterwards. Only [`super::state::StageController`]'s
/// timeout-exhaustion path removes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    logical_address: CecLogicalAddress,
    pub physical_address: PhysicalAddress,
    pub port_id: PortId,
    pub device_type: DeviceType,
    pub vendor_id: VendorId,
    pub display_name: String,
}

impl DeviceRecord {
    pub fn new(logical_address: CecLogicalAddress) -> Self {
        DeviceRecord {
            logical_address,
            physical_address: PhysicalAddress::default(),
            port_id: PortId::default(),
            device_type: DeviceType::default(),
            vendor_id: VendorId::default(),
            display_name: String::new(),
        }
    }

    pub fn logical_address(&self) -> CecLogicalAddress {
        self.logical_address
    }

    /// Project into the immutable, wire-independent shape handed to the
    /// completion callback (§4.6).
    pub fn to_device_info(&self) -> DeviceInfo {
        DeviceInfo {
            logical_address: self.logical_address,
            physical_address: self.physical_address,
            port_id: self.port_id,
            device_type: self.device_type,
            vendor_id: self.vendor_id,
            display_name: self.display_name.clone(),
        }
    }
}
