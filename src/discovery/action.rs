use super::bus::BusGateway;
use super::cache::MessageCache;
use super::error::ConfigError;
use super::local_device::LocalDevice;
use super::state::{DiscoveryState, Outcome, QueryContext, StageController};
use super::types::{DeviceInfo, InboundFrame, PollScope, DEVICE_POLLING_RETRY, TIMEOUT_MS, TIMEOUT_RETRY};
use crate::discovery::bus::ActionTimer;
use crate::sys::CecLogicalAddress;

/// Retry counters this large would mean hours of retrying a single stage;
/// treated as a configuration mistake rather than honored literally.
const MAX_SANE_RETRIES: u8 = 100;

/// §4.4/§4.11 tunables. Plain struct with a `Default` impl in the same style
/// as the transport's own [`crate::CecLogAddrs::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Retry count passed to the initial bus poll.
    pub poll_retries: u8,
    /// Retry count for a single per-device, per-stage query.
    pub timeout_retries: u8,
    /// Per-query timeout.
    pub timeout_ms: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            poll_retries: DEVICE_POLLING_RETRY,
            timeout_retries: TIMEOUT_RETRY,
            timeout_ms: TIMEOUT_MS,
        }
    }
}

impl DiscoveryConfig {
    /// Build a config from host-supplied tunables, rejecting values that
    /// would make the retry/timeout policy in §4.4 meaningless.
    pub fn validated(
        poll_retries: u8,
        timeout_retries: u8,
        timeout_ms: u64,
    ) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if poll_retries > MAX_SANE_RETRIES {
            return Err(ConfigError::RetryCountTooLarge("poll_retries"));
        }
        if timeout_retries > MAX_SANE_RETRIES {
            return Err(ConfigError::RetryCountTooLarge("timeout_retries"));
        }
        Ok(DiscoveryConfig {
            poll_retries,
            timeout_retries,
            timeout_ms,
        })
    }
}

/// §9 design note: the completion callback is "an owned one-shot
/// continuation rather than a registered listener". `on_device_discovered`
/// is the one exception — it may fire zero or more times, so it stays a
/// `FnMut` the caller can skip entirely.
pub struct DiscoveryCallbacks {
    on_discovery_done: Option<Box<dyn FnOnce(Vec<DeviceInfo>) + Send>>,
    on_device_discovered: Box<dyn FnMut(DeviceInfo) + Send>,
}

impl DiscoveryCallbacks {
    pub fn new(on_discovery_done: impl FnOnce(Vec<DeviceInfo>) + Send + 'static) -> Self {
        DiscoveryCallbacks {
            on_discovery_done: Some(Box::new(on_discovery_done)),
            on_device_discovered: Box::new(|_| {}),
        }
    }

    pub fn with_device_discovered(mut self, f: impl FnMut(DeviceInfo) + Send + 'static) -> Self {
        self.on_device_discovered = Box::new(f);
        self
    }
}

/// C6: the lifecycle handle a host (the HDMI control service's CEC
/// dispatcher) drives. Every ingress method (§6) is expected to be called
/// serially from that single dispatcher thread; see §5.
pub struct DiscoveryAction {
    controller: StageController,
    timer: ActionTimer,
    local_device: LocalDevice,
    own_address: CecLogicalAddress,
    config: DiscoveryConfig,
    callbacks: DiscoveryCallbacks,
}

impl DiscoveryAction {
    pub fn new(
        own_address: CecLogicalAddress,
        local_device: LocalDevice,
        config: DiscoveryConfig,
        callbacks: DiscoveryCallbacks,
    ) -> Self {
        DiscoveryAction {
            controller: StageController::new(),
            timer: ActionTimer::new(),
            local_device,
            own_address,
            config,
            callbacks,
        }
    }

    pub fn state(&self) -> DiscoveryState {
        self.controller.state()
    }

    /// No timer should ever be armed once the run finishes (§8 invariant).
    pub fn has_armed_timer(&self) -> bool {
        self.timer.is_armed()
    }

    /// §4.1 `start`. Starting while not in state `None` is not supported by
    /// this spec; construct a fresh action per run instead.
    pub fn start(&mut self, bus: &mut dyn BusGateway) -> bool {
        self.controller.start_polling();
        log::info!("discovery starting poll sweep");
        bus.poll_devices(
            PollScope::REVERSE_ORDER | PollScope::REMOTES_ONLY,
            self.config.poll_retries,
        );
        true
    }

    pub fn on_poll_complete(
        &mut self,
        acked: Vec<CecLogicalAddress>,
        bus: &mut dyn BusGateway,
        cache: &mut MessageCache,
    ) {
        let Self {
            controller,
            timer,
            local_device,
            own_address,
            config,
            callbacks,
        } = self;
        let mut ctx = QueryContext {
            bus,
            cache,
            timer,
            local_device,
            own_address: *own_address,
            config,
            on_device_discovered: &mut *callbacks.on_device_discovered,
        };
        let outcome = controller.on_poll_complete(acked, &mut ctx);
        self.settle(outcome);
    }

    /// §4.1 `on_command`. Returns `false` for frames Discovery does not care
    /// about so the host can route them elsewhere.
    pub fn on_command(
        &mut self,
        frame: &InboundFrame,
        bus: &mut dyn BusGateway,
        cache: &mut MessageCache,
    ) -> bool {
        let Self {
            controller,
            timer,
            local_device,
            own_address,
            config,
            callbacks,
        } = self;
        let mut ctx = QueryContext {
            bus,
            cache,
            timer,
            local_device,
            own_address: *own_address,
            config,
            on_device_discovered: &mut *callbacks.on_device_discovered,
        };
        let result = controller.on_command(frame, &mut ctx);
        self.settle(result.outcome);
        result.consumed
    }

    /// §4.1 `on_timer`. Ignores `state_tag` mismatches (a stale timer).
    pub fn on_timer(
        &mut self,
        state_tag: DiscoveryState,
        bus: &mut dyn BusGateway,
        cache: &mut MessageCache,
    ) {
        let Self {
            controller,
            timer,
            local_device,
            own_address,
            config,
            callbacks,
        } = self;
        let mut ctx = QueryContext {
            bus,
            cache,
            timer,
            local_device,
            own_address: *own_address,
            config,
            on_device_discovered: &mut *callbacks.on_device_discovered,
        };
        let outcome = controller.on_timer(state_tag, &mut ctx);
        self.settle(outcome);
    }

    /// §4.1 `cancel`. Moves to `Finished` without invoking the done callback.
    pub fn cancel(&mut self, bus: &mut dyn BusGateway) {
        self.timer.clear(bus);
        self.controller.cancel();
        self.callbacks.on_discovery_done = None;
    }

    fn settle(&mut self, outcome: Outcome) {
        if outcome == Outcome::WrapUp {
            self.finish();
        }
    }

    /// §4.6 wrap-up: project the surviving records, invoke the done callback
    /// exactly once, flush deferred TV messages, and go `Finished`.
    fn finish(&mut self) {
        let infos: Vec<DeviceInfo> = self
            .controller
            .take_devices()
            .iter()
            .map(|record| record.to_device_info())
            .collect();
        log::info!("discovery finished with {} device(s)", infos.len());
        self.local_device.flush_delayed_messages();
        if let Some(done) = self.callbacks.on_discovery_done.take() {
            done(infos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::bus::{DiscoveryOpcode, MockBusGateway};
    use crate::discovery::local_device::{LocalDevice, MockAudioSystemDelegate, MockTvDelegate};
    use crate::discovery::types::{PhysicalAddress, PortId, VendorId};
    use crate::sys::{CecAbortReason, CecLogicalAddress, CecOpcode};
    use std::sync::{Arc, Mutex};

    fn done_collector() -> (
        DiscoveryCallbacks,
        Arc<Mutex<Option<Vec<DeviceInfo>>>>,
    ) {
        let result = Arc::new(Mutex::new(None));
        let captured = result.clone();
        let callbacks = DiscoveryCallbacks::new(move |infos| {
            *captured.lock().unwrap() = Some(infos);
        });
        (callbacks, result)
    }

    fn reply(source: CecLogicalAddress, opcode: CecOpcode, params: Vec<u8>) -> InboundFrame {
        InboundFrame::new(source, opcode, params)
    }

    #[test]
    fn empty_bus_completes_with_empty_inventory_and_sends_nothing() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().times(0);
        bus.expect_arm_timer().times(0);

        let (callbacks, result) = done_collector();
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Playback1,
            LocalDevice::Other,
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        action.on_poll_complete(vec![], &mut bus, &mut cache);

        assert_eq!(result.lock().unwrap().as_ref().unwrap(), &Vec::<DeviceInfo>::new());
        assert_eq!(action.state(), DiscoveryState::Finished);
        assert!(!action.has_armed_timer());
    }

    #[test]
    fn single_cooperative_device_is_fully_enumerated() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().returning(|_, _, _| Ok(()));
        bus.expect_arm_timer().returning(|_, _| ());
        bus.expect_clear_timer().returning(|| ());

        let (callbacks, result) = done_collector();
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Tv,
            LocalDevice::Other,
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        action.on_poll_complete(vec![CecLogicalAddress::Playback1], &mut bus, &mut cache);
        assert_eq!(action.state(), DiscoveryState::WaitingForPhysicalAddress);

        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::ReportPhysicalAddr,
                vec![0x10, 0x00, 0x04],
            ),
            &mut bus,
            &mut cache,
        );
        assert_eq!(action.state(), DiscoveryState::WaitingForOsdName);

        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::SetOsdName,
                b"Player".to_vec(),
            ),
            &mut bus,
            &mut cache,
        );
        assert_eq!(action.state(), DiscoveryState::WaitingForVendorId);

        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::DeviceVendorId,
                vec![0x00, 0x80, 0x45],
            ),
            &mut bus,
            &mut cache,
        );

        assert_eq!(action.state(), DiscoveryState::Finished);
        let infos = result.lock().unwrap().take().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].logical_address, CecLogicalAddress::Playback1);
        assert_eq!(infos[0].physical_address, PhysicalAddress(0x1000));
        assert_eq!(infos[0].device_type.0, 4);
        assert_eq!(infos[0].display_name, "Player");
        assert_eq!(infos[0].vendor_id, VendorId(0x0080_45));
        assert!(!action.has_armed_timer());
    }

    #[test]
    fn silent_device_is_dropped_after_exhausting_retries() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().returning(|_, _, _| Ok(()));
        bus.expect_arm_timer().returning(|_, _| ());
        bus.expect_clear_timer().returning(|| ());

        let (callbacks, result) = done_collector();
        let config = DiscoveryConfig {
            timeout_retries: 2,
            ..Default::default()
        };
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Tv,
            LocalDevice::Other,
            config,
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        action.on_poll_complete(vec![CecLogicalAddress::Tuner1], &mut bus, &mut cache);
        let state = action.state();

        for _ in 0..=config.timeout_retries {
            action.on_timer(state, &mut bus, &mut cache);
        }

        assert_eq!(action.state(), DiscoveryState::Finished);
        assert_eq!(result.lock().unwrap().as_ref().unwrap(), &Vec::<DeviceInfo>::new());
        assert!(!action.has_armed_timer());
    }

    #[test]
    fn feature_abort_on_osd_name_falls_back_to_default_name() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().returning(|_, _, _| Ok(()));
        bus.expect_arm_timer().returning(|_, _| ());
        bus.expect_clear_timer().returning(|| ());

        let (callbacks, result) = done_collector();
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Tv,
            LocalDevice::Other,
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        action.on_poll_complete(vec![CecLogicalAddress::Playback1], &mut bus, &mut cache);
        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::ReportPhysicalAddr,
                vec![0x20, 0x00, 0x01],
            ),
            &mut bus,
            &mut cache,
        );
        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::FeatureAbort,
                vec![CecOpcode::GiveOsdName.into(), CecAbortReason::Unrecognized.into()],
            ),
            &mut bus,
            &mut cache,
        );
        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::DeviceVendorId,
                vec![0x00, 0x00, 0x01],
            ),
            &mut bus,
            &mut cache,
        );

        let infos = result.lock().unwrap().take().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].display_name, "Playback1");
        assert_eq!(infos[0].vendor_id, VendorId(1));
    }

    #[test]
    fn cache_hit_avoids_all_outbound_frames() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().times(0);
        bus.expect_arm_timer().times(0);
        bus.expect_clear_timer().returning(|| ());

        let (callbacks, result) = done_collector();
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Tv,
            LocalDevice::Other,
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        let source = CecLogicalAddress::Playback1;
        cache.put(
            source,
            reply(source, CecOpcode::ReportPhysicalAddr, vec![0x10, 0x00, 0x04]),
        );
        cache.put(source, reply(source, CecOpcode::SetOsdName, b"Player".to_vec()));
        cache.put(
            source,
            reply(source, CecOpcode::DeviceVendorId, vec![0x00, 0x80, 0x45]),
        );

        action.on_poll_complete(vec![source], &mut bus, &mut cache);

        let infos = result.lock().unwrap().take().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].display_name, "Player");
    }

    #[test]
    fn mismatched_source_is_dropped_then_retried() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().returning(|_, _, _| Ok(()));
        bus.expect_arm_timer().returning(|_, _| ());
        bus.expect_clear_timer().returning(|| ());

        let (callbacks, _result) = done_collector();
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Tv,
            LocalDevice::Other,
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        action.on_poll_complete(vec![CecLogicalAddress::Playback1], &mut bus, &mut cache);
        let state = action.state();

        let consumed = action.on_command(
            &reply(
                CecLogicalAddress::Tuner1,
                CecOpcode::ReportPhysicalAddr,
                vec![0x10, 0x00, 0x04],
            ),
            &mut bus,
            &mut cache,
        );
        assert!(consumed);
        assert_eq!(action.state(), DiscoveryState::WaitingForPhysicalAddress);

        action.on_timer(state, &mut bus, &mut cache);
        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::ReportPhysicalAddr,
                vec![0x10, 0x00, 0x04],
            ),
            &mut bus,
            &mut cache,
        );
        assert_eq!(action.state(), DiscoveryState::WaitingForOsdName);
    }

    #[test]
    fn tv_local_device_is_notified_of_switch_and_flushes_on_wrapup() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().returning(|_, _, _| Ok(()));
        bus.expect_arm_timer().returning(|_, _| ());
        bus.expect_clear_timer().returning(|| ());

        let mut tv = MockTvDelegate::new();
        tv.expect_port_id_of().returning(|_| PortId(2));
        tv.expect_update_cec_switch_info().times(1).return_const(());
        tv.expect_process_all_delayed_messages().times(1).return_const(());

        let (callbacks, _result) = done_collector();
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Tv,
            LocalDevice::Tv(Box::new(tv)),
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        action.on_poll_complete(vec![CecLogicalAddress::Playback1], &mut bus, &mut cache);
        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::ReportPhysicalAddr,
                vec![0x10, 0x00, 0x04],
            ),
            &mut bus,
            &mut cache,
        );
        action.on_command(
            &reply(CecLogicalAddress::Playback1, CecOpcode::SetOsdName, b"x".to_vec()),
            &mut bus,
            &mut cache,
        );
        action.on_command(
            &reply(CecLogicalAddress::Playback1, CecOpcode::DeviceVendorId, vec![0, 0, 1]),
            &mut bus,
            &mut cache,
        );
        assert_eq!(action.state(), DiscoveryState::Finished);
    }

    #[test]
    fn audio_system_local_device_resolves_port_id() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().returning(|_, _, _| Ok(()));
        bus.expect_arm_timer().returning(|_, _| ());
        bus.expect_clear_timer().returning(|| ());

        let mut audio = MockAudioSystemDelegate::new();
        audio.expect_port_id_of().returning(|_| PortId(3));

        let (callbacks, result) = done_collector();
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Audiosystem,
            LocalDevice::AudioSystem(Box::new(audio)),
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        action.on_poll_complete(vec![CecLogicalAddress::Playback1], &mut bus, &mut cache);
        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::ReportPhysicalAddr,
                vec![0x30, 0x00, 0x04],
            ),
            &mut bus,
            &mut cache,
        );
        action.on_command(
            &reply(CecLogicalAddress::Playback1, CecOpcode::SetOsdName, b"x".to_vec()),
            &mut bus,
            &mut cache,
        );
        action.on_command(
            &reply(CecLogicalAddress::Playback1, CecOpcode::DeviceVendorId, vec![0, 0, 1]),
            &mut bus,
            &mut cache,
        );

        let infos = result.lock().unwrap().take().unwrap();
        assert_eq!(infos[0].port_id, PortId(3));
    }

    #[test]
    fn cancel_suppresses_the_done_callback() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_clear_timer().returning(|| ());

        let (callbacks, result) = done_collector();
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Tv,
            LocalDevice::Other,
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));
        action.cancel(&mut bus);

        assert_eq!(action.state(), DiscoveryState::Finished);
        assert!(result.lock().unwrap().is_none());
    }

    #[test]
    fn device_discovered_hook_fires_once_per_surviving_device() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().returning(|_, _, _| Ok(()));
        bus.expect_arm_timer().returning(|_, _| ());
        bus.expect_clear_timer().returning(|| ());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let (callbacks, _result) = done_collector();
        let callbacks = callbacks.with_device_discovered(move |info| {
            seen_clone.lock().unwrap().push(info.logical_address);
        });

        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Tv,
            LocalDevice::Other,
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        action.on_poll_complete(vec![CecLogicalAddress::Playback1], &mut bus, &mut cache);
        action.on_command(
            &reply(
                CecLogicalAddress::Playback1,
                CecOpcode::ReportPhysicalAddr,
                vec![0x10, 0x00, 0x04],
            ),
            &mut bus,
            &mut cache,
        );
        action.on_command(
            &reply(CecLogicalAddress::Playback1, CecOpcode::SetOsdName, b"x".to_vec()),
            &mut bus,
            &mut cache,
        );
        action.on_command(
            &reply(CecLogicalAddress::Playback1, CecOpcode::DeviceVendorId, vec![0, 0, 1]),
            &mut bus,
            &mut cache,
        );

        assert_eq!(*seen.lock().unwrap(), vec![CecLogicalAddress::Playback1]);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert_eq!(
            DiscoveryConfig::validated(3, 5, 0),
            Err(ConfigError::ZeroTimeout)
        );
    }

    #[test]
    fn absurd_retry_count_is_rejected() {
        assert_eq!(
            DiscoveryConfig::validated(255, 5, 2000),
            Err(ConfigError::RetryCountTooLarge("poll_retries"))
        );
    }

    #[test]
    fn sane_config_is_accepted() {
        assert_eq!(
            DiscoveryConfig::validated(3, 5, 2000),
            Ok(DiscoveryConfig::default())
        );
    }

    #[test]
    fn unrelated_frame_is_not_consumed() {
        let mut bus = MockBusGateway::new();
        bus.expect_poll_devices().times(1).return_const(());
        bus.expect_send().returning(|_, _, _| Ok(()));
        bus.expect_arm_timer().returning(|_, _| ());

        let (callbacks, _result) = done_collector();
        let mut action = DiscoveryAction::new(
            CecLogicalAddress::Tv,
            LocalDevice::Other,
            DiscoveryConfig::default(),
            callbacks,
        );
        assert!(action.start(&mut bus));

        let mut cache = MessageCache::new();
        action.on_poll_complete(vec![CecLogicalAddress::Playback1], &mut bus, &mut cache);

        let consumed = action.on_command(
            &reply(CecLogicalAddress::Playback1, CecOpcode::Standby, vec![]),
            &mut bus,
            &mut cache,
        );
        assert!(!consumed);
    }
}
