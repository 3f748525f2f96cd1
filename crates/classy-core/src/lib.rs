#![cfg_attr(not(test), no_std)]

//! Platform-independent core of the Classy analog watch face.
//!
//! - [`angle`]: pure time-to-hand-angle conversion
//! - [`settings`]: persisted two-flag settings record and its store
//! - [`channel`]: per-field validation of configuration messages
//! - [`scheduler`]: tick subscription state machine and dirty-element policy
//! - [`render`]: face renderer issuing draw commands to a [`render::FaceSurface`]
//! - [`app`]: event context owning all of the above
//!
//! Hardware and host glue implement the collaborator traits
//! ([`settings::RecordStore`], [`scheduler::TickSource`], [`render::FaceSurface`]).

pub mod angle;
pub mod app;
pub mod channel;
pub mod layout;
pub mod mock;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod time;
pub mod trig;
