//! The radio-channel instantiation of the engine. Interference comes either
//! from transmission overlap in time or from plain physical proximity, and a
//! device that loses the spill lottery is flagged "no channel" rather than
//! rewritten into any stream.

pub mod allocate;
pub mod device;
pub mod interference;
pub mod schedule;

pub use allocate::{allocate_channels, apply_allocation, ChannelAllocation};
pub use device::MobileDevice;
pub use schedule::{ChannelRequest, Schedule, SlotKind, TimeSlot, Transmission};
