use super::types::InboundFrame;
use crate::sys::{CecLogicalAddress, CecOpcode};
use std::collections::HashMap;

/// Per-(source, opcode) most-recent-frame cache (C1).
///
/// Belongs to the local device, not to any single discovery run: `put` is
/// called by the host on every accepted inbound frame, `get` only by the
/// per-stage query procedure before it decides whether to emit a request.
/// Last-write-wins, unbounded — the host governs eviction.
#[derive(Debug, Default)]
pub struct MessageCache {
    entries: HashMap<(CecLogicalAddress, CecOpcode), InboundFrame>,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, source: CecLogicalAddress, frame: InboundFrame) {
        if let Some(opcode) = frame.opcode {
            self.entries.insert((source, opcode), frame);
        }
    }

    pub fn get(&self, source: CecLogicalAddress, opcode: CecOpcode) -> Option<&InboundFrame> {
        self.entries.get(&(source, opcode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_empty_cache() {
        let cache = MessageCache::new();
        assert!(cache
            .get(CecLogicalAddress::Playback1, CecOpcode::ReportPhysicalAddr)
            .is_none());
    }

    #[test]
    fn hit_after_put_keeps_latest() {
        let mut cache = MessageCache::new();
        let source = CecLogicalAddress::Playback1;
        cache.put(
            source,
            InboundFrame::new(source, CecOpcode::DeviceVendorId, vec![0, 0, 1]),
        );
        cache.put(
            source,
            InboundFrame::new(source, CecOpcode::DeviceVendorId, vec![0, 0, 2]),
        );
        let hit = cache.get(source, CecOpcode::DeviceVendorId).unwrap();
        assert_eq!(hit.params, vec![0, 0, 2]);
    }

    #[test]
    fn different_opcodes_and_sources_dont_collide() {
        let mut cache = MessageCache::new();
        cache.put(
            CecLogicalAddress::Playback1,
            InboundFrame::new(
                CecLogicalAddress::Playback1,
                CecOpcode::DeviceVendorId,
                vec![1],
            ),
        );
        assert!(cache
            .get(CecLogicalAddress::Playback1, CecOpcode::SetOsdName)
            .is_none());
        assert!(cache
            .get(CecLogicalAddress::Audiosystem, CecOpcode::DeviceVendorId)
            .is_none());
    }
}
