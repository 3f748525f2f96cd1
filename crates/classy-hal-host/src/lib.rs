//! Host platform glue for the Classy face.
//!
//! Implements the core collaborator traits on a desktop host: flash-emulated
//! record storage, a wall-clock tick source, a layered one-bit canvas, and the
//! text form of the settings channel.

pub mod clock;
pub mod render;
pub mod settings_line;
pub mod storage;
