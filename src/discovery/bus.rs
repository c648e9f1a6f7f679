use super::state::DiscoveryState;
use super::types::PollScope;
use crate::sys::{CecLogicalAddress, CecOpcode};
use std::io;

/// The three request opcodes Discovery ever emits (§4.3 stage table).
///
/// The action never builds a [`crate::CecMsg`] itself (§6: "No frames are
/// built by the action directly; it calls the host's message-builder
/// helpers") — it names which request it wants and leaves encoding to the
/// [`BusGateway`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOpcode {
    GivePhysicalAddress,
    GiveOsdName,
    GiveDeviceVendorId,
}

impl DiscoveryOpcode {
    pub fn request_opcode(self) -> CecOpcode {
        match self {
            DiscoveryOpcode::GivePhysicalAddress => CecOpcode::GivePhysicalAddr,
            DiscoveryOpcode::GiveOsdName => CecOpcode::GiveOsdName,
            DiscoveryOpcode::GiveDeviceVendorId => CecOpcode::GiveDeviceVendorId,
        }
    }

    pub fn reply_opcode(self) -> CecOpcode {
        match self {
            DiscoveryOpcode::GivePhysicalAddress => CecOpcode::ReportPhysicalAddr,
            DiscoveryOpcode::GiveOsdName => CecOpcode::SetOsdName,
            DiscoveryOpcode::GiveDeviceVendorId => CecOpcode::DeviceVendorId,
        }
    }
}

/// C3: the host collaborator the Discovery action drives and is driven by.
///
/// Concretely implemented by [`super::bus_tokio::CecBusGateway`] (feature
/// `tokio`) on top of [`crate::tokio::AsyncCec`]; mocked in Discovery's own
/// tests (§4.12).
#[cfg_attr(test, mockall::automock)]
pub trait BusGateway: Send {
    /// Request a bus-wide polling sweep. The result arrives later via
    /// [`super::action::DiscoveryAction::on_poll_complete`], not as a return value.
    fn poll_devices(&mut self, flags: PollScope, retries: u8);

    /// Send one of the three Discovery request opcodes from `from` to `to`.
    fn send(
        &mut self,
        from: CecLogicalAddress,
        to: CecLogicalAddress,
        opcode: DiscoveryOpcode,
    ) -> io::Result<()>;

    /// Arm the single pending timeout, tagged with the state it belongs to.
    fn arm_timer(&mut self, state_tag: DiscoveryState, timeout_ms: u64);

    /// Cancel any pending timeout. A no-op if none is armed.
    fn clear_timer(&mut self);
}

/// C2: tracks whether a timer is currently armed and for which state, so the
/// action can assert "no timer armed" at wrap-up without asking the host.
#[derive(Debug, Default)]
pub struct ActionTimer {
    armed_for: Option<DiscoveryState>,
}

impl ActionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, bus: &mut dyn BusGateway, state: DiscoveryState, timeout_ms: u64) {
        bus.arm_timer(state, timeout_ms);
        self.armed_for = Some(state);
    }

    /// Clear the timer if one is armed. Idempotent.
    pub fn clear(&mut self, bus: &mut dyn BusGateway) {
        if self.armed_for.take().is_some() {
            bus.clear_timer();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed_for.is_some()
    }

    pub fn armed_for(&self) -> Option<DiscoveryState> {
        self.armed_for
    }
}
