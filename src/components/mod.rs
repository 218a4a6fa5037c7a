//! Page behaviours
//!
//! Each module finds its elements, registers [`Handler`](crate::page::Handler)
//! values on the page, and exposes the functions those handlers run.

pub mod cart;
pub mod dialogs;
pub mod flash;
pub mod forms;
pub mod loading;
pub mod nav;
pub mod quantity;
pub mod tooltips;
