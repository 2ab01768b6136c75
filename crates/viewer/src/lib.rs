//! Participant navigation for the document tile viewer.
//!
//! [`Controller`] owns the loaded project, reacts to participant selection
//! and drives a [`Surface`] (viewer chrome plus rendering engine) with the
//! grid layout and tile sources of the active participant.

pub mod controller;
pub mod error;
pub mod navigation;
pub mod surface;

pub use controller::*;
pub use error::*;
pub use navigation::*;
pub use surface::*;
