use super::types::{DeviceType, PhysicalAddress, PortId};
use crate::sys::CecLogicalAddress;

/// Port/switch-bookkeeping capabilities of a TV-role local device.
///
/// §6 egress: `tv().update_cec_switch_info(...)`, `tv().process_all_delayed_messages()`.
#[cfg_attr(test, mockall::automock)]
pub trait TvDelegate: Send {
    fn port_id_of(&self, physical_address: PhysicalAddress) -> PortId;
    fn update_cec_switch_info(
        &self,
        logical_address: CecLogicalAddress,
        device_type: DeviceType,
        physical_address: PhysicalAddress,
    );
    fn process_all_delayed_messages(&self);
}

/// Port-lookup capability of an audio-system-role local device.
///
/// §6 egress: `audio_system().port_id_of(physical)`.
#[cfg_attr(test, mockall::automock)]
pub trait AudioSystemDelegate: Send {
    fn port_id_of(&self, physical_address: PhysicalAddress) -> PortId;
}

/// Replaces the two runtime-type-probing booleans in the original source with
/// a tagged variant (§9 design note): the local device is either a TV, an
/// audio system, or neither, and each role has its own capability set.
pub enum LocalDevice {
    Tv(Box<dyn TvDelegate>),
    AudioSystem(Box<dyn AudioSystemDelegate>),
    Other,
}

impl LocalDevice {
    pub fn port_id_of(&self, physical_address: PhysicalAddress) -> PortId {
        match self {
            LocalDevice::Tv(tv) => tv.port_id_of(physical_address),
            LocalDevice::AudioSystem(audio) => audio.port_id_of(physical_address),
            LocalDevice::Other => PortId::INVALID,
        }
    }

    /// No-ops for [`LocalDevice::AudioSystem`] and [`LocalDevice::Other`]; only
    /// a TV tracks CEC switch topology.
    pub fn notify_switch_discovered(
        &self,
        logical_address: CecLogicalAddress,
        device_type: DeviceType,
        physical_address: PhysicalAddress,
    ) {
        if let LocalDevice::Tv(tv) = self {
            tv.update_cec_switch_info(logical_address, device_type, physical_address);
        }
    }

    /// No-op unless the local device is a TV.
    pub fn flush_delayed_messages(&self) {
        if let LocalDevice::Tv(tv) = self {
            tv.process_all_delayed_messages();
        }
    }

    pub fn is_tv(&self) -> bool {
        matches!(self, LocalDevice::Tv(_))
    }
}
