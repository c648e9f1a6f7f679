//! Feature-gated tokio host: wires [`DiscoveryAction`] to a real CEC adapter.
//!
//! This is the "host" the core state machine leaves abstract (§6 egress) —
//! a worked example, not the thing under test. Discovery's own tests mock
//! [`BusGateway`] directly instead of going through this module.

use super::action::{DiscoveryAction, DiscoveryCallbacks, DiscoveryConfig};
use super::bus::{BusGateway, DiscoveryOpcode};
use super::cache::MessageCache;
use super::local_device::LocalDevice;
use super::state::DiscoveryState;
use super::types::{DeviceInfo, InboundFrame, PollScope, ADDR_TV, ADDR_UNREGISTERED};
use crate::sys::CecLogicalAddress;
use crate::tokio::AsyncCec;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Funneled through one channel so nothing about Discovery itself becomes
/// concurrent (§5): polling results, inbound frames and timer expiries are
/// all just events the single runner loop below drains in order.
enum RunnerEvent {
    PollComplete(Vec<CecLogicalAddress>),
    Frame(InboundFrame),
    TimerFired(DiscoveryState),
}

/// [`BusGateway`] on top of [`AsyncCec`]. Polling and sends run as detached
/// tasks that report back through `events`; `arm_timer`/`clear_timer` bump
/// `timer_generation` so a superseded sleep never fires.
pub struct CecBusGateway {
    device: Arc<AsyncCec>,
    events: mpsc::UnboundedSender<RunnerEvent>,
    timer_generation: Arc<AtomicU64>,
    own_address: CecLogicalAddress,
}

impl CecBusGateway {
    fn new(
        device: Arc<AsyncCec>,
        events: mpsc::UnboundedSender<RunnerEvent>,
        own_address: CecLogicalAddress,
    ) -> Self {
        CecBusGateway {
            device,
            events,
            timer_generation: Arc::new(AtomicU64::new(0)),
            own_address,
        }
    }
}

impl BusGateway for CecBusGateway {
    fn poll_devices(&mut self, flags: PollScope, retries: u8) {
        let device = self.device.clone();
        let events = self.events.clone();
        let own_address = self.own_address;
        let remotes_only = flags.contains(PollScope::REMOTES_ONLY);
        tokio::spawn(async move {
            let addrs: Vec<u8> = if flags.contains(PollScope::REVERSE_ORDER) {
                (ADDR_TV..ADDR_UNREGISTERED).rev().collect()
            } else {
                (ADDR_TV..ADDR_UNREGISTERED).collect()
            };
            let mut acked = Vec::new();
            for raw in addrs {
                let addr: CecLogicalAddress = match raw.try_into() {
                    Ok(addr) => addr,
                    Err(_) => continue,
                };
                if remotes_only && addr == own_address {
                    continue;
                }
                let mut claimed = false;
                for _ in 0..=retries {
                    if device.poll_for_ack(addr, addr).await.is_ok() {
                        claimed = true;
                        break;
                    }
                }
                if claimed {
                    acked.push(addr);
                }
            }
            let _ = events.send(RunnerEvent::PollComplete(acked));
        });
    }

    fn send(
        &mut self,
        from: CecLogicalAddress,
        to: CecLogicalAddress,
        opcode: DiscoveryOpcode,
    ) -> io::Result<()> {
        let device = self.device.clone();
        let request = opcode.request_opcode();
        tokio::spawn(async move {
            if let Err(err) = device.transmit(from, to, request).await {
                log::warn!("transmit {request:?} to {to:?} failed: {err}");
            }
        });
        Ok(())
    }

    fn arm_timer(&mut self, state_tag: DiscoveryState, timeout_ms: u64) {
        let generation = self.timer_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let marker = self.timer_generation.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(timeout_ms)).await;
            if marker.load(Ordering::SeqCst) == generation {
                let _ = events.send(RunnerEvent::TimerFired(state_tag));
            }
        });
    }

    fn clear_timer(&mut self) {
        self.timer_generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Drive one [`DiscoveryAction`] to completion against a real adapter: start
/// it, then funnel polling results, inbound frames and timer expiries through
/// one channel until the completion callback fires.
pub async fn run_discovery(
    device: Arc<AsyncCec>,
    own_address: CecLogicalAddress,
    local_device: LocalDevice,
    config: DiscoveryConfig,
) -> Vec<DeviceInfo> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let (done_tx, done_rx) = oneshot::channel();
    let callbacks = DiscoveryCallbacks::new(move |infos| {
        let _ = done_tx.send(infos);
    });
    let mut bus = CecBusGateway::new(device.clone(), tx.clone(), own_address);
    let mut action = DiscoveryAction::new(own_address, local_device, config, callbacks);
    let mut cache = MessageCache::new();

    action.start(&mut bus);

    let reader_events = tx.clone();
    let reader_device = device.clone();
    tokio::spawn(async move {
        loop {
            match reader_device.rec().await {
                Ok(msg) => {
                    let frame = InboundFrame::from_cec_msg(&msg);
                    if reader_events.send(RunnerEvent::Frame(frame)).is_err() {
                        break;
                    }
                }
                Err(err) => log::warn!("cec receive failed: {err}"),
            }
        }
    });

    while let Some(event) = rx.recv().await {
        match event {
            RunnerEvent::PollComplete(acked) => action.on_poll_complete(acked, &mut bus, &mut cache),
            RunnerEvent::Frame(frame) => {
                cache.put(frame.source, frame.clone());
                action.on_command(&frame, &mut bus, &mut cache);
            }
            RunnerEvent::TimerFired(state_tag) => action.on_timer(state_tag, &mut bus, &mut cache),
        }
        if action.state() == DiscoveryState::Finished {
            break;
        }
    }

    done_rx.await.unwrap_or_default()
}
