use super::bus::{ActionTimer, BusGateway, DiscoveryOpcode};
use super::cache::MessageCache;
use super::local_device::LocalDevice;
use super::record::DeviceRecord;
use super::types::{
    default_name_for_device_type, default_name_for_logical_address, is_valid_for_query,
    DeviceInfo, DeviceType, InboundFrame, PhysicalAddress, VendorId,
};
use crate::discovery::action::DiscoveryConfig;
use crate::sys::{CecLogicalAddress, CecOpcode};

/// The discovery state machine: Polling → PhysicalAddress → OsdName →
/// VendorId → Finished, plus the idle `None` state before `start()` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    None,
    WaitingForPolling,
    WaitingForPhysicalAddress,
    WaitingForOsdName,
    WaitingForVendorId,
    Finished,
}

/// The three non-polling stages, each a total function of the shared query
/// shape in §4.3 over a different request/reply opcode pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    PhysicalAddress,
    OsdName,
    VendorId,
}

impl Stage {
    fn state(self) -> DiscoveryState {
        match self {
            Stage::PhysicalAddress => DiscoveryState::WaitingForPhysicalAddress,
            Stage::OsdName => DiscoveryState::WaitingForOsdName,
            Stage::VendorId => DiscoveryState::WaitingForVendorId,
        }
    }

    fn discovery_opcode(self) -> DiscoveryOpcode {
        match self {
            Stage::PhysicalAddress => DiscoveryOpcode::GivePhysicalAddress,
            Stage::OsdName => DiscoveryOpcode::GiveOsdName,
            Stage::VendorId => DiscoveryOpcode::GiveDeviceVendorId,
        }
    }

    fn next(self) -> Option<Stage> {
        match self {
            Stage::PhysicalAddress => Some(Stage::OsdName),
            Stage::OsdName => Some(Stage::VendorId),
            Stage::VendorId => None,
        }
    }

    /// `true` if a Feature Abort of this stage's request is itself a valid
    /// completion signal (§4.3: true for OsdName/VendorId, not PhysicalAddress).
    fn feature_abort_completes(self) -> bool {
        !matches!(self, Stage::PhysicalAddress)
    }
}

/// What the caller (the [`super::action::DiscoveryAction`] façade) should do
/// after a `StageController` method returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The run is still in progress; nothing further to do right now.
    Continue,
    /// The run is over — wrap up and invoke the completion callback.
    WrapUp,
}

/// The result of routing one inbound frame through [`StageController::on_command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether this frame belonged to Discovery (the host should not route it
    /// elsewhere if `true`).
    pub consumed: bool,
    pub outcome: Outcome,
}

/// Everything a `StageController` method needs to act, bundled to avoid a
/// five-plus argument list on every call.
pub struct QueryContext<'a> {
    pub bus: &'a mut dyn BusGateway,
    pub cache: &'a mut MessageCache,
    pub timer: &'a mut ActionTimer,
    pub local_device: &'a LocalDevice,
    pub own_address: CecLogicalAddress,
    pub config: &'a DiscoveryConfig,
    pub on_device_discovered: &'a mut dyn FnMut(DeviceInfo),
}

/// C5: the four-state discovery state machine (§4.2–§4.4), including the
/// in-progress device inventory (C4) it walks one index at a time.
#[derive(Debug)]
pub struct StageController {
    state: DiscoveryState,
    devices: Vec<DeviceRecord>,
    processed_device_count: usize,
    timeout_retry: u8,
}

impl Default for StageController {
    fn default() -> Self {
        StageController {
            state: DiscoveryState::None,
            devices: Vec::new(),
            processed_device_count: 0,
            timeout_retry: 0,
        }
    }
}

impl StageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    pub fn start_polling(&mut self) {
        self.devices.clear();
        self.processed_device_count = 0;
        self.timeout_retry = 0;
        self.state = DiscoveryState::WaitingForPolling;
    }

    pub fn cancel(&mut self) {
        self.state = DiscoveryState::Finished;
    }

    /// §4.1 `on_poll_complete`.
    pub fn on_poll_complete(
        &mut self,
        acked: Vec<CecLogicalAddress>,
        ctx: &mut QueryContext,
    ) -> Outcome {
        if acked.is_empty() {
            log::info!("poll returned no devices; discovery finishes with an empty inventory");
            self.state = DiscoveryState::Finished;
            return Outcome::WrapUp;
        }
        log::info!("poll acked {} device(s): {acked:?}", acked.len());
        self.devices = acked.into_iter().map(DeviceRecord::new).collect();
        self.processed_device_count = 0;
        self.timeout_retry = 0;
        self.state = DiscoveryState::WaitingForPhysicalAddress;
        self.check_and_proceed(ctx)
    }

    fn current_stage(&self) -> Option<Stage> {
        match self.state {
            DiscoveryState::WaitingForPhysicalAddress => Some(Stage::PhysicalAddress),
            DiscoveryState::WaitingForOsdName => Some(Stage::OsdName),
            DiscoveryState::WaitingForVendorId => Some(Stage::VendorId),
            _ => None,
        }
    }

    /// §4.2 `check_and_proceed`.
    pub fn check_and_proceed(&mut self, ctx: &mut QueryContext) -> Outcome {
        let stage = match self.current_stage() {
            Some(stage) => stage,
            None => return Outcome::WrapUp,
        };
        if self.devices.is_empty() {
            ctx.timer.clear(ctx.bus);
            self.state = DiscoveryState::Finished;
            return Outcome::WrapUp;
        }
        if self.processed_device_count == self.devices.len() {
            self.processed_device_count = 0;
            return match stage.next() {
                Some(next) => {
                    self.state = next.state();
                    self.check_and_proceed(ctx)
                }
                None => {
                    self.state = DiscoveryState::Finished;
                    Outcome::WrapUp
                }
            };
        }
        self.issue_query(stage, ctx)
    }

    /// §4.3 steps 1–4, for the device currently at the head of the walk.
    fn issue_query(&mut self, stage: Stage, ctx: &mut QueryContext) -> Outcome {
        let addr = self.devices[self.processed_device_count].logical_address();
        if !is_valid_for_query(addr) {
            // §9 open question: advance so an invalid head address cannot
            // loop `check_and_proceed` forever; in practice the polling
            // layer never hands us an invalid address to begin with.
            log::warn!("skipping {addr:?}, not valid for query");
            self.processed_device_count += 1;
            return self.check_and_proceed(ctx);
        }
        ctx.timer.clear(ctx.bus);
        let reply_opcode = stage.discovery_opcode().reply_opcode();
        if let Some(frame) = ctx.cache.get(addr, reply_opcode).cloned() {
            log::debug!("cache hit for {addr:?} {reply_opcode:?}");
            return self.handle_reply(stage, addr, &frame, ctx);
        }
        if let Err(err) = ctx.bus.send(ctx.own_address, addr, stage.discovery_opcode()) {
            log::warn!("send to {addr:?} failed: {err}; treating as unanswered");
        }
        ctx.timer.arm(ctx.bus, stage.state(), ctx.config.timeout_ms);
        Outcome::Continue
    }

    fn frame_is_stage_reply(&self, stage: Stage, frame: &InboundFrame) -> bool {
        frame.opcode == Some(stage.discovery_opcode().reply_opcode())
            || (stage.feature_abort_completes()
                && frame.is_feature_abort_of(stage.discovery_opcode().request_opcode()))
    }

    /// §4.1 `on_command`.
    pub fn on_command(&mut self, frame: &InboundFrame, ctx: &mut QueryContext) -> CommandResult {
        let stage = match self.current_stage() {
            Some(stage) => stage,
            None => {
                return CommandResult {
                    consumed: false,
                    outcome: Outcome::Continue,
                }
            }
        };
        if self.processed_device_count >= self.devices.len() {
            return CommandResult {
                consumed: false,
                outcome: Outcome::Continue,
            };
        }
        if !self.frame_is_stage_reply(stage, frame) {
            return CommandResult {
                consumed: false,
                outcome: Outcome::Continue,
            };
        }
        let head = self.devices[self.processed_device_count].logical_address();
        if frame.source != head {
            log::warn!(
                "dropping {:?} from {:?}: expected source {head:?} for stage {stage:?}",
                frame.opcode,
                frame.source
            );
            return CommandResult {
                consumed: true,
                outcome: Outcome::Continue,
            };
        }
        let outcome = self.handle_reply(stage, head, frame, ctx);
        CommandResult {
            consumed: true,
            outcome,
        }
    }

    /// §4.1 `on_timer`, applying the retry policy in §4.4.
    pub fn on_timer(&mut self, state_tag: DiscoveryState, ctx: &mut QueryContext) -> Outcome {
        if state_tag != self.state {
            log::debug!("ignoring stale timer for {state_tag:?}, current state is {:?}", self.state);
            return Outcome::Continue;
        }
        let stage = match self.current_stage() {
            Some(stage) => stage,
            None => return Outcome::Continue,
        };
        if self.processed_device_count >= self.devices.len() {
            return self.check_and_proceed(ctx);
        }
        let addr = self.devices[self.processed_device_count].logical_address();
        if self.timeout_retry < ctx.config.timeout_retries {
            self.timeout_retry += 1;
            log::debug!(
                "retry {}/{} for {addr:?} in stage {stage:?}",
                self.timeout_retry,
                ctx.config.timeout_retries
            );
            if let Err(err) = ctx.bus.send(ctx.own_address, addr, stage.discovery_opcode()) {
                log::warn!("retry send to {addr:?} failed: {err}");
            }
            ctx.timer.arm(ctx.bus, stage.state(), ctx.config.timeout_ms);
            Outcome::Continue
        } else {
            log::warn!(
                "{addr:?} unresponsive after {} retries in stage {stage:?}; dropping from inventory",
                ctx.config.timeout_retries
            );
            self.timeout_retry = 0;
            self.devices.remove(self.processed_device_count);
            self.check_and_proceed(ctx)
        }
    }

    /// §4.5: apply one successful (or feature-aborted) stage reply, then
    /// advance the walk.
    fn handle_reply(
        &mut self,
        stage: Stage,
        source: CecLogicalAddress,
        frame: &InboundFrame,
        ctx: &mut QueryContext,
    ) -> Outcome {
        let idx = self.processed_device_count;
        match stage {
            Stage::PhysicalAddress => self.apply_physical_address_reply(idx, source, frame, ctx),
            Stage::OsdName => self.apply_osd_name_reply(idx, source, frame),
            Stage::VendorId => self.apply_vendor_id_reply(idx, frame, ctx),
        }
        self.timeout_retry = 0;
        self.processed_device_count += 1;
        ctx.timer.clear(ctx.bus);
        self.check_and_proceed(ctx)
    }

    fn apply_physical_address_reply(
        &mut self,
        idx: usize,
        source: CecLogicalAddress,
        frame: &InboundFrame,
        ctx: &mut QueryContext,
    ) {
        if frame.params.len() < 3 {
            log::warn!("malformed ReportPhysicalAddr payload from {source:?}: {:?}", frame.params);
            return;
        }
        let physical = PhysicalAddress::from_be_bytes(frame.params[0], frame.params[1]);
        let device_type = DeviceType(frame.params[2]);
        let port_id = ctx.local_device.port_id_of(physical);
        {
            let record = &mut self.devices[idx];
            record.physical_address = physical;
            record.device_type = device_type;
            record.port_id = port_id;
            record.display_name = default_name_for_device_type(device_type);
        }
        ctx.local_device
            .notify_switch_discovered(source, device_type, physical);
    }

    fn apply_osd_name_reply(&mut self, idx: usize, source: CecLogicalAddress, frame: &InboundFrame) {
        let fallback = || default_name_for_logical_address(source);
        self.devices[idx].display_name = if frame.opcode == Some(CecOpcode::SetOsdName) {
            if frame.params.is_ascii() {
                String::from_utf8(frame.params.clone()).unwrap_or_else(|_| fallback())
            } else {
                log::warn!("non-ASCII OSD name from {source:?}; using default name");
                fallback()
            }
        } else {
            // matching Feature Abort
            fallback()
        };
    }

    fn apply_vendor_id_reply(&mut self, idx: usize, frame: &InboundFrame, ctx: &mut QueryContext) {
        self.devices[idx].vendor_id = if frame.opcode == Some(CecOpcode::DeviceVendorId) && frame.params.len() >= 3
        {
            VendorId::from_bytes([frame.params[0], frame.params[1], frame.params[2]])
        } else {
            VendorId::UNKNOWN
        };
        let info = self.devices[idx].to_device_info();
        (ctx.on_device_discovered)(info);
    }

    pub fn take_devices(&mut self) -> Vec<DeviceRecord> {
        std::mem::take(&mut self.devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::bus::MockBusGateway;
    use crate::sys::CecAbortReason;
    use rstest::rstest;

    fn controller_at(stage: Stage, addr: CecLogicalAddress) -> StageController {
        StageController {
            state: stage.state(),
            devices: vec![DeviceRecord::new(addr)],
            processed_device_count: 0,
            timeout_retry: 0,
        }
    }

    struct Harness {
        bus: MockBusGateway,
        cache: MessageCache,
        timer: ActionTimer,
        local_device: LocalDevice,
        config: DiscoveryConfig,
    }

    impl Harness {
        fn new() -> Self {
            let mut bus = MockBusGateway::new();
            bus.expect_send().returning(|_, _, _| Ok(()));
            bus.expect_arm_timer().returning(|_, _| ());
            bus.expect_clear_timer().returning(|| ());
            Harness {
                bus,
                cache: MessageCache::new(),
                timer: ActionTimer::new(),
                local_device: LocalDevice::Other,
                config: DiscoveryConfig::default(),
            }
        }

        fn ctx<'a>(&'a mut self, noop: &'a mut dyn FnMut(DeviceInfo)) -> QueryContext<'a> {
            QueryContext {
                bus: &mut self.bus,
                cache: &mut self.cache,
                timer: &mut self.timer,
                local_device: &self.local_device,
                own_address: CecLogicalAddress::Tv,
                config: &self.config,
                on_device_discovered: noop,
            }
        }
    }

    #[rstest]
    #[case::physical_address(
        Stage::PhysicalAddress,
        CecOpcode::ReportPhysicalAddr,
        vec![0x10, 0x00, 0x04],
        DiscoveryState::WaitingForOsdName
    )]
    #[case::osd_name(Stage::OsdName, CecOpcode::SetOsdName, b"x".to_vec(), DiscoveryState::WaitingForVendorId)]
    #[case::vendor_id(
        Stage::VendorId,
        CecOpcode::DeviceVendorId,
        vec![0, 0, 1],
        DiscoveryState::Finished
    )]
    fn stage_reply_from_expected_source_advances(
        #[case] stage: Stage,
        #[case] reply_opcode: CecOpcode,
        #[case] payload: Vec<u8>,
        #[case] expected_next: DiscoveryState,
    ) {
        let addr = CecLogicalAddress::Playback1;
        let mut controller = controller_at(stage, addr);
        let mut harness = Harness::new();
        let mut noop = |_: DeviceInfo| {};
        let mut ctx = harness.ctx(&mut noop);
        let frame = InboundFrame::new(addr, reply_opcode, payload);

        let result = controller.on_command(&frame, &mut ctx);

        assert!(result.consumed);
        assert_eq!(controller.state, expected_next);
    }

    #[rstest]
    #[case::osd_name(Stage::OsdName, CecOpcode::GiveOsdName, DiscoveryState::WaitingForVendorId)]
    #[case::vendor_id(Stage::VendorId, CecOpcode::GiveDeviceVendorId, DiscoveryState::Finished)]
    fn feature_abort_completes_osd_name_and_vendor_id_stages(
        #[case] stage: Stage,
        #[case] rejected_request: CecOpcode,
        #[case] expected_next: DiscoveryState,
    ) {
        let addr = CecLogicalAddress::Playback1;
        let mut controller = controller_at(stage, addr);
        let mut harness = Harness::new();
        let mut noop = |_: DeviceInfo| {};
        let mut ctx = harness.ctx(&mut noop);
        let frame = InboundFrame::new(
            addr,
            CecOpcode::FeatureAbort,
            vec![rejected_request.into(), CecAbortReason::Unrecognized.into()],
        );

        let result = controller.on_command(&frame, &mut ctx);

        assert!(result.consumed);
        assert_eq!(controller.state, expected_next);
    }

    #[test]
    fn feature_abort_does_not_complete_physical_address_stage() {
        let addr = CecLogicalAddress::Playback1;
        let mut controller = controller_at(Stage::PhysicalAddress, addr);
        let mut harness = Harness::new();
        let mut noop = |_: DeviceInfo| {};
        let mut ctx = harness.ctx(&mut noop);
        let frame = InboundFrame::new(
            addr,
            CecOpcode::FeatureAbort,
            vec![CecOpcode::GivePhysicalAddr.into(), CecAbortReason::Unrecognized.into()],
        );

        let result = controller.on_command(&frame, &mut ctx);

        assert!(!result.consumed);
        assert_eq!(controller.state, DiscoveryState::WaitingForPhysicalAddress);
    }

    #[test]
    fn mismatched_source_is_dropped_without_advancing() {
        let head = CecLogicalAddress::Playback1;
        let mut controller = controller_at(Stage::OsdName, head);
        let mut harness = Harness::new();
        let mut noop = |_: DeviceInfo| {};
        let mut ctx = harness.ctx(&mut noop);
        let frame = InboundFrame::new(CecLogicalAddress::Tuner1, CecOpcode::SetOsdName, b"x".to_vec());

        let result = controller.on_command(&frame, &mut ctx);

        assert!(result.consumed);
        assert_eq!(controller.state, DiscoveryState::WaitingForOsdName);
        assert_eq!(controller.processed_device_count, 0);
    }

    #[test]
    fn timeout_exhaustion_drops_the_only_device_and_finishes() {
        let addr = CecLogicalAddress::Playback1;
        let mut controller = controller_at(Stage::OsdName, addr);
        let mut harness = Harness::new();
        harness.config.timeout_retries = 1;
        let mut noop = |_: DeviceInfo| {};
        let mut ctx = harness.ctx(&mut noop);

        controller.on_timer(DiscoveryState::WaitingForOsdName, &mut ctx);
        assert_eq!(controller.state, DiscoveryState::WaitingForOsdName);
        controller.on_timer(DiscoveryState::WaitingForOsdName, &mut ctx);

        assert_eq!(controller.state, DiscoveryState::Finished);
        assert!(controller.devices.is_empty());
    }

    #[test]
    fn stale_timer_tag_is_ignored() {
        let addr = CecLogicalAddress::Playback1;
        let mut controller = controller_at(Stage::OsdName, addr);
        let mut harness = Harness::new();
        let mut noop = |_: DeviceInfo| {};
        let mut ctx = harness.ctx(&mut noop);

        let outcome = controller.on_timer(DiscoveryState::WaitingForVendorId, &mut ctx);

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(controller.state, DiscoveryState::WaitingForOsdName);
        assert_eq!(controller.timeout_retry, 0);
    }
}
