// Core types for Tessera: UI resources, action events and the assessment domain

pub mod action;
pub mod ids;
pub mod resource;
pub mod types;

pub use action::ActionEvent;
pub use ids::IdGenerator;
pub use resource::{build, FrameSize, Resource, ResourceUri, UiResource, UiResourceConfig};
pub use types::*;
