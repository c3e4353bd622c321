//! The time-slot stream: the temporal counterpart of the instruction
//! stream. Each slot lists the transmissions becoming active and the
//! requests releasing channels; a frame-start slot resets the active set the
//! way a block boundary resets liveness.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::graph::NodeId;

/// A device transmitting in a slot. `active` means the transmission
/// continues past the slot and the device keeps occupying its channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transmission<N> {
    pub device: N,
    pub active: bool,
}

/// A channel request resolving in a slot. `releases` means the device gives
/// the channel up after this slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelRequest<N> {
    pub device: N,
    pub releases: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    /// Starts a new frame; the active set is rebuilt from this slot's
    /// transmissions alone.
    FrameStart,
    Normal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeSlot<N> {
    pub kind: SlotKind,
    pub transmissions: Vec<Transmission<N>>,
    pub requests: Vec<ChannelRequest<N>>,
    pub weight: f64,
}

impl<N> TimeSlot<N> {
    pub fn new(
        kind: SlotKind,
        transmissions: Vec<Transmission<N>>,
        requests: Vec<ChannelRequest<N>>,
    ) -> Self {
        Self {
            kind,
            transmissions,
            requests,
            weight: 1.0,
        }
    }

    pub fn frame_start(transmissions: Vec<Transmission<N>>) -> Self {
        Self::new(SlotKind::FrameStart, transmissions, Vec::new())
    }

    pub fn normal(transmissions: Vec<Transmission<N>>, requests: Vec<ChannelRequest<N>>) -> Self {
        Self::new(SlotKind::Normal, transmissions, requests)
    }
}

impl<N> Transmission<N> {
    pub fn new(device: N, active: bool) -> Self {
        Self { device, active }
    }
}

impl<N> ChannelRequest<N> {
    pub fn new(device: N, releases: bool) -> Self {
        Self { device, releases }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Schedule<N: NodeId> {
    slots: Vec<TimeSlot<N>>,
}

impl<N: NodeId> Schedule<N> {
    pub fn new(slots: Vec<TimeSlot<N>>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[TimeSlot<N>] {
        &self.slots
    }

    pub fn set_slots(&mut self, slots: Vec<TimeSlot<N>>) {
        self.slots = slots;
    }

    /// Every device mentioned anywhere in the schedule, in first-appearance
    /// order.
    pub fn devices(&self) -> IndexSet<N> {
        let mut devices = IndexSet::new();

        for slot in &self.slots {
            for transmission in &slot.transmissions {
                devices.insert(transmission.device.clone());
            }
            for request in &slot.requests {
                devices.insert(request.device.clone());
            }
        }

        devices
    }

    /// Rebuilds the schedule substituting device ids through `mapping`;
    /// unmapped ids pass through unchanged.
    pub fn remap_devices(&mut self, mapping: &HashMap<N, N>) {
        let remap = |device: &N| mapping.get(device).unwrap_or(device).clone();

        let slots = self
            .slots
            .iter()
            .map(|slot| TimeSlot {
                kind: slot.kind,
                transmissions: slot
                    .transmissions
                    .iter()
                    .map(|t| Transmission::new(remap(&t.device), t.active))
                    .collect(),
                requests: slot
                    .requests
                    .iter()
                    .map(|r| ChannelRequest::new(remap(&r.device), r.releases))
                    .collect(),
                weight: slot.weight,
            })
            .collect();

        self.slots = slots;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devices_in_first_appearance_order() {
        let schedule = Schedule::new(vec![
            TimeSlot::frame_start(vec![Transmission::new("D2", true)]),
            TimeSlot::normal(
                vec![Transmission::new("D1", true)],
                vec![ChannelRequest::new("D3", true)],
            ),
        ]);

        let devices: Vec<_> = schedule.devices().into_iter().collect();
        assert_eq!(devices, vec!["D2", "D1", "D3"]);
    }

    #[test]
    fn test_remap_substitutes_everywhere() {
        let mut schedule = Schedule::new(vec![TimeSlot::normal(
            vec![Transmission::new("old", true)],
            vec![ChannelRequest::new("old", false), ChannelRequest::new("other", true)],
        )]);

        let mut mapping = HashMap::new();
        mapping.insert("old", "new");
        schedule.remap_devices(&mapping);

        let slot = &schedule.slots()[0];
        assert_eq!(slot.transmissions[0].device, "new");
        assert_eq!(slot.requests[0].device, "new");
        assert_eq!(slot.requests[1].device, "other");
    }
}
