//! Embassy tasks
//!
//! The step tick runs on a high-priority interrupt executor so it preempts
//! the controller, which spins on the thread-mode executor while a move is
//! in flight. Status reporting and the stop button run on a medium-priority
//! interrupt executor for the same reason.

pub mod controller;
pub mod status;
pub mod stop;
pub mod tick;

pub use controller::{controller_task, PrinterController};
pub use status::status_task;
pub use stop::stop_button_task;
pub use tick::{tick_task, StepTick};
