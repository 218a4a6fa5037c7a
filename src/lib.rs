//! Storefront page behaviours over an injectable document
//!
//! The modal controller, form validation, cart buttons, responsive
//! navigation, flash messages, tooltips and quantity steppers all run against
//! the [`dom::Document`] trait, hosted by a [`page::Page`] that owns event
//! dispatch and a virtual clock.

pub mod components;
pub mod config;
pub mod dom;
pub mod error;
pub mod page;
pub mod request;
pub mod script;
pub mod version;

pub use components::dialogs::{close, open, ModalController};
pub use config::Config;
pub use dom::{Document, MemoryDocument, NodeId, Selector};
pub use error::{UiError, UiResult};
pub use page::Page;
