//! The channel-assignment pipeline. Unlike the register side there is no
//! stream to rewrite: a spilled device simply transmits without a channel
//! this round, so applying the allocation is a matter of setting flags.

use indexmap::{IndexMap, IndexSet};

use crate::color::{color_graph, ColorChoice};
use crate::graph::{InterferenceGraph, NodeId};
use crate::spill::{choose_spills, MissingCost};

use super::device::MobileDevice;

/// The outcome of channel allocation: every device ends up either in
/// `assignments` or in `denied`, never both.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelAllocation<N: NodeId, C> {
    pub assignments: IndexMap<N, C>,
    pub denied: IndexSet<N>,
}

/// Eviction cost per device: transmit power times usage frequency, so the
/// loudest, busiest devices are the last to lose their channel.
pub fn estimate_spill_costs<N: NodeId, C>(devices: &[MobileDevice<N, C>]) -> IndexMap<N, f64> {
    devices
        .iter()
        .map(|device| (device.id.clone(), device.power * device.usage_frequency))
        .collect()
}

/// Denies just enough devices that the rest can be colored, then colors
/// them. Returns `None` when the coloring heuristic fails even on the
/// reduced graph, an expected outcome the caller must handle, not a panic.
pub fn allocate_channels<N: NodeId, C: Clone + PartialEq>(
    devices: &[MobileDevice<N, C>],
    graph: &InterferenceGraph<N>,
    channels: &[C],
    choice: ColorChoice,
) -> Option<ChannelAllocation<N, C>> {
    let costs = estimate_spill_costs(devices);
    let ids: Vec<N> = devices.iter().map(|device| device.id.clone()).collect();

    // Devices missing from the cost map are unknown traffic; shed them
    // first, hence the Zero policy.
    let denied = choose_spills(graph, &ids, channels.len(), &costs, MissingCost::Zero);

    let mut reduced = graph.clone();
    for id in denied.iter() {
        reduced.remove_node(id);
    }

    let survivors: Vec<N> = ids
        .iter()
        .filter(|id| !denied.contains(*id))
        .cloned()
        .collect();

    let assignments = color_graph(&reduced, &survivors, channels, choice)?;

    log::debug!(
        "assigned {} channels, denied {} devices",
        assignments.len(),
        denied.len()
    );

    Some(ChannelAllocation {
        assignments,
        denied,
    })
}

/// Writes an allocation back onto the device records.
pub fn apply_allocation<N: NodeId, C: Clone>(
    devices: &mut [MobileDevice<N, C>],
    allocation: &ChannelAllocation<N, C>,
) {
    for device in devices.iter_mut() {
        if allocation.denied.contains(&device.id) {
            device.denied = true;
            device.channel = None;
        } else {
            device.denied = false;
            device.channel = allocation.assignments.get(&device.id).cloned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::interference::{
        build_spatial_graph, DEFAULT_DISTANCE_THRESHOLD, DEFAULT_INTERFERENCE_THRESHOLD,
    };

    type Device = MobileDevice<&'static str, &'static str>;

    fn crowded_cell() -> Vec<Device> {
        // Four collinear devices 30 apart: all within range of one another,
        // a 4-clique in the spatial graph.
        vec![
            MobileDevice::new("A", 0.0, 0.0, 80.0),
            MobileDevice::new("B", 30.0, 0.0, 80.0),
            MobileDevice::new("C", 60.0, 0.0, 80.0),
            MobileDevice::new("D", 90.0, 0.0, 80.0),
        ]
    }

    #[test]
    fn test_cost_model_is_multiplicative() {
        let devices: Vec<Device> =
            vec![MobileDevice::new("A", 0.0, 0.0, 50.0).with_usage_frequency(2.0)];

        let costs = estimate_spill_costs(&devices);
        assert_eq!(costs[&"A"], 100.0);
    }

    #[test]
    fn test_partition_covers_every_device() {
        let devices = crowded_cell();
        let graph = build_spatial_graph(
            &devices,
            DEFAULT_DISTANCE_THRESHOLD,
            DEFAULT_INTERFERENCE_THRESHOLD,
        );

        let allocation =
            allocate_channels(&devices, &graph, &["ch1", "ch2"], ColorChoice::FirstAvailable)
                .unwrap();

        assert_eq!(allocation.assignments.len() + allocation.denied.len(), 4);
        // A 4-clique against 2 channels: at least two devices must go
        // without.
        assert!(allocation.denied.len() >= 2);
    }

    #[test]
    fn test_assignments_respect_interference() {
        let devices = crowded_cell();
        let graph = build_spatial_graph(
            &devices,
            DEFAULT_DISTANCE_THRESHOLD,
            DEFAULT_INTERFERENCE_THRESHOLD,
        );

        let allocation =
            allocate_channels(&devices, &graph, &["ch1", "ch2"], ColorChoice::FirstAvailable)
                .unwrap();

        for (a, b, _) in graph.edges() {
            if let (Some(ca), Some(cb)) =
                (allocation.assignments.get(&a), allocation.assignments.get(&b))
            {
                assert_ne!(ca, cb);
            }
        }
    }

    #[test]
    fn test_low_cost_devices_are_denied_first() {
        let mut devices = crowded_cell();
        devices[0].power = 10.0; // A is the quietest; it should be shed early.

        let graph = build_spatial_graph(
            &devices,
            DEFAULT_DISTANCE_THRESHOLD,
            DEFAULT_INTERFERENCE_THRESHOLD,
        );

        let allocation =
            allocate_channels(&devices, &graph, &["ch1", "ch2"], ColorChoice::FirstAvailable)
                .unwrap();

        assert!(allocation.denied.contains(&"A"));
    }

    #[test]
    fn test_apply_allocation_sets_flags() {
        let mut devices = crowded_cell();
        let graph = build_spatial_graph(
            &devices,
            DEFAULT_DISTANCE_THRESHOLD,
            DEFAULT_INTERFERENCE_THRESHOLD,
        );

        let allocation =
            allocate_channels(&devices, &graph, &["ch1", "ch2"], ColorChoice::FirstAvailable)
                .unwrap();
        apply_allocation(&mut devices, &allocation);

        for device in &devices {
            if device.denied {
                assert!(device.channel.is_none());
            } else {
                assert!(device.channel.is_some());
            }
        }
    }
}
