//! **xmodes** — inspect and switch X11 RandR video modes.
//!
//! For every connected output with an active controller, xmodes decodes the
//! monitor's EDID identity, lists the supported modes with their derived
//! refresh rates, and can switch the output to a chosen mode.
//!
//! # Architecture
//!
//! The crate is organised around one core trait:
//!
//! * [`traits::DisplayServer`] — abstracts the display-server queries and
//!   the reconfiguration request, so catalog building ([`catalog`]) and
//!   mode switching ([`switch`]) are not coupled to a live X connection.
//!
//! The concrete implementation lives in [`xrandr`] (RandR over x11rb).
//! [`edid`] and [`timing`] are pure functions with no dependencies; the
//! data model shared by everything is in [`snapshot`].

pub mod catalog;
pub mod edid;
pub mod snapshot;
pub mod switch;
pub mod timing;
pub mod traits;
pub mod xrandr;
