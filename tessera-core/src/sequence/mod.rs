//! Composite operations built on blocking moves

pub mod inventory;
pub mod job;
pub mod pick_place;

pub use inventory::Inventory;
pub use job::{run_pattern, JobError, Pattern, Progress};
pub use pick_place::{
    cell_position, pick_and_place, plan, slot_position, PickPlaceCommand, PickPlaceError,
    PickPlaceStep,
};
