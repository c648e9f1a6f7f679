//! HDMI-CEC Device Discovery: a bus-wide sweep that enumerates every remote
//! device's logical address, physical address, port, device type and vendor
//! ID (and, best-effort, its OSD name).
//!
//! [`action::DiscoveryAction`] is the entry point; everything else in this
//! module exists to support it. The action is host-driven: a single
//! dispatcher thread calls its ingress methods serially (`start`,
//! `on_poll_complete`, `on_command`, `on_timer`, `cancel`) and the action
//! calls back out through [`bus::BusGateway`] and [`local_device::LocalDevice`].

pub mod action;
pub mod bus;
pub mod cache;
pub mod error;
pub mod local_device;
pub mod record;
pub mod state;
pub mod types;

#[cfg(feature = "tokio")]
pub mod bus_tokio;

pub use action::{DiscoveryAction, DiscoveryCallbacks, DiscoveryConfig};
pub use bus::BusGateway;
pub use cache::MessageCache;
pub use error::ConfigError;
pub use local_device::{AudioSystemDelegate, LocalDevice, TvDelegate};
pub use record::DeviceRecord;
pub use state::DiscoveryState;
pub use types::{DeviceInfo, DeviceType, InboundFrame, PhysicalAddress, PollScope, PortId, VendorId};
