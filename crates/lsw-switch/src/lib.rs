//! lsw-switch
//!
//! In-memory state machine for a single named two-position switch.
//!
//! - `state` is stored verbatim; `"on"` / `"off"` are the recognised positions.
//! - `next` is the UI hint for the following transition. It only moves when the
//!   requested state is recognised.
//! - `timestamp` is nanoseconds since the Unix epoch of the last transition
//!   (`0` before the first one) and never decreases.
//!
//! No IO and no locking here. The daemon owns synchronisation.

mod switch;
mod view;

pub use switch::{complement, Switch, OFF, ON};
pub use view::{format_timestamp, SwitchSnapshot, SwitchView};
