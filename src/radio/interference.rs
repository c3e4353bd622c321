//! The two interference models for radio channels.
//!
//! The temporal model is the same liveness sweep the register allocator
//! runs: devices whose transmissions overlap in time interfere. The spatial
//! model is a pairwise geometric check: devices close enough to each other,
//! weighted by combined transmit power, interfere regardless of timing. Both
//! feed the same graph type and the same coloring pipeline.

use crate::graph::{InterferenceGraph, NodeId};
use crate::live::LiveSet;

use super::device::MobileDevice;
use super::schedule::{Schedule, SlotKind};

/// Default spatial range in which two devices can interfere at all.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 150.0;

/// Default minimum interference score worth an edge.
pub const DEFAULT_INTERFERENCE_THRESHOLD: f64 = 0.1;

/// Builds interference from transmission overlap in time. A release request
/// retires the device *before* the slot's new transmissions are considered,
/// so a device handing its channel off in the same slot another starts does
/// not interfere with it.
pub fn build_temporal_graph<N: NodeId>(schedule: &Schedule<N>) -> InterferenceGraph<N> {
    let mut graph = InterferenceGraph::new();
    let mut active = LiveSet::new();

    for slot in schedule.slots() {
        if slot.kind == SlotKind::FrameStart {
            active.clear();

            for transmission in &slot.transmissions {
                if transmission.active {
                    active.add(transmission.device.clone());
                }
            }

            continue;
        }

        for request in &slot.requests {
            if request.releases {
                active.kill(&request.device);
            }
        }

        for transmission in &slot.transmissions {
            for device in active.iter() {
                if *device != transmission.device {
                    log::trace!(
                        "temporal interference: {:?} <-> {:?}",
                        transmission.device,
                        device
                    );
                    graph.add_edge(transmission.device.clone(), device.clone());
                }
            }

            if transmission.active {
                active.add(transmission.device.clone());
            }
        }
    }

    graph
}

pub fn device_distance<N: NodeId, C>(a: &MobileDevice<N, C>, b: &MobileDevice<N, C>) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// The interference score between two devices: 0.0 at or beyond the distance
/// threshold, otherwise inversely proportional to distance and scaled by the
/// devices' combined transmit power (normalized against a 200-unit pair),
/// capped at 1.0.
pub fn interference_score<N: NodeId, C>(
    a: &MobileDevice<N, C>,
    b: &MobileDevice<N, C>,
    distance_threshold: f64,
) -> f64 {
    let distance = device_distance(a, b);
    if distance >= distance_threshold {
        return 0.0;
    }

    let proximity = 1.0 - distance / distance_threshold;
    let power_factor = (a.power + b.power) / 200.0;
    (proximity * power_factor).min(1.0)
}

/// Builds interference from device geometry: every pair scoring at least
/// `interference_threshold` gets an edge weighted by its score. O(n²) in the
/// device count.
pub fn build_spatial_graph<N: NodeId, C>(
    devices: &[MobileDevice<N, C>],
    distance_threshold: f64,
    interference_threshold: f64,
) -> InterferenceGraph<N> {
    let mut graph = InterferenceGraph::new();

    for (i, a) in devices.iter().enumerate() {
        for b in &devices[i + 1..] {
            let score = interference_score(a, b, distance_threshold);

            if score >= interference_threshold {
                log::trace!(
                    "spatial interference: {:?} <-> {:?} ({:.3})",
                    a.id,
                    b.id,
                    score
                );
                graph.add_edge_weighted(a.id.clone(), b.id.clone(), score);
            }
        }
    }

    graph
}
