//! Modal dialog lifecycle
//!
//! Dialogs are discovered by class, wired once for dismissal (close controls,
//! backdrop clicks, Escape) and shown or hidden by id from anywhere on the page.

pub mod controller;
pub mod types;

pub use controller::{close, open, ModalController};
pub use types::*;
