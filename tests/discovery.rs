use cec_discovery::discovery::{
    BusGateway, DeviceInfo, DiscoveryAction, DiscoveryCallbacks, DiscoveryConfig, InboundFrame,
    LocalDevice, MessageCache, PollScope,
};
use cec_discovery::{CecLogicalAddress, CecOpcode};
use mockall::mock;
use rstest::rstest;
use std::io;
use std::sync::{Arc, Mutex};

mock! {
    Bus {}
    impl BusGateway for Bus {
        fn poll_devices(&mut self, flags: PollScope, retries: u8);
        fn send(
            &mut self,
            from: CecLogicalAddress,
            to: CecLogicalAddress,
            opcode: cec_discovery::discovery::bus::DiscoveryOpcode,
        ) -> io::Result<()>;
        fn arm_timer(&mut self, state_tag: cec_discovery::discovery::DiscoveryState, timeout_ms: u64);
        fn clear_timer(&mut self);
    }
}

fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

#[rstest]
fn two_devices_are_fully_enumerated_end_to_end() {
    init_logging();

    let mut bus = MockBus::new();
    bus.expect_poll_devices().times(1).return_const(());
    bus.expect_send().returning(|_, _, _| Ok(()));
    bus.expect_arm_timer().returning(|_, _| ());
    bus.expect_clear_timer().returning(|| ());

    let collected: Arc<Mutex<Option<Vec<DeviceInfo>>>> = Arc::new(Mutex::new(None));
    let sink = collected.clone();
    let callbacks = DiscoveryCallbacks::new(move |infos| {
        *sink.lock().unwrap() = Some(infos);
    });

    let mut action = DiscoveryAction::new(
        CecLogicalAddress::Tv,
        LocalDevice::Other,
        DiscoveryConfig::default(),
        callbacks,
    );
    let mut cache = MessageCache::new();

    assert!(action.start(&mut bus));
    action.on_poll_complete(
        vec![CecLogicalAddress::Playback1, CecLogicalAddress::Tuner1],
        &mut bus,
        &mut cache,
    );

    for source in [CecLogicalAddress::Playback1, CecLogicalAddress::Tuner1] {
        action.on_command(
            &InboundFrame::new(source, CecOpcode::ReportPhysicalAddr, vec![0x10, 0x00, 0x04]),
            &mut bus,
            &mut cache,
        );
    }
    for source in [CecLogicalAddress::Playback1, CecLogicalAddress::Tuner1] {
        action.on_command(
            &InboundFrame::new(source, CecOpcode::SetOsdName, format!("{source:?}").into_bytes()),
            &mut bus,
            &mut cache,
        );
    }
    for source in [CecLogicalAddress::Playback1, CecLogicalAddress::Tuner1] {
        action.on_command(
            &InboundFrame::new(source, CecOpcode::DeviceVendorId, vec![0x00, 0x00, 0x10]),
            &mut bus,
            &mut cache,
        );
    }

    let infos = collected.lock().unwrap().take().expect("discovery should have finished");
    assert_eq!(infos.len(), 2);
    assert!(infos.iter().any(|i| i.logical_address == CecLogicalAddress::Playback1));
    assert!(infos.iter().any(|i| i.logical_address == CecLogicalAddress::Tuner1));
    assert!(!action.has_armed_timer());
}
