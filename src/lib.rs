//! # kempe
//!
//! An interference-graph allocation engine. Given a stream of events that
//! declare and retire named resources over time, it builds a graph of which
//! resources are simultaneously live, assigns each resource one of a fixed
//! number of slots so that no two interfering resources share one. When
//! the palette runs out, it evicts the cheapest resources until the rest
//! fits.
//!
//! The crate ships two instantiations of the same core:
//!
//! - [`lir`] allocates registers to an explicit instruction stream,
//!   including copy coalescing and reload/store spill-code insertion;
//! - [`radio`] allocates radio channels to mobile devices, with
//!   interference derived either from transmission overlap in time or from
//!   physical proximity.
//!
//! The core pieces ([`graph::InterferenceGraph`], [`color::color_graph`],
//! [`spill::choose_spills`]) are usable directly for any other domain that
//! can phrase its constraints as pairwise interference.
//!
//! The engine is a greedy heuristic (Kempe's simplify/select with
//! lowest-cost eviction), not an exact solver: it may spill more than the
//! optimum, and coloring can fail even after spilling. Failures are
//! ordinary return values, never panics.

pub mod color;
pub mod graph;
pub mod live;
pub mod lir;
pub mod radio;
pub mod spill;

pub use color::{color_graph, ColorChoice};
pub use graph::{InterferenceGraph, NodeId};
pub use live::LiveSet;
pub use spill::{choose_spills, CostMap, MissingCost};
