//! Interactive bandgap calibration
//!
//! The user watches the supply with a multimeter while the console shows the
//! supply estimated from the bandgap, and nudges the reference until the two
//! agree. The session is a two-state machine:
//!
//! ```text
//!            Space / Load ok / Save
//!   ┌──────┐ ─────────────────────▶ ┌────────┐  Up/Down: adjust
//!   │ Menu │                        │ Tuning │  idle:    refresh display
//!   └──────┘ ◀───────────────────── └────────┘
//!      │      Space / Escape / q
//!      │ Escape / q
//!      ▼
//!    exit
//! ```

pub mod session;
pub mod state;

pub use session::{CalibrationSession, SessionPoll};
pub use state::{Action, Adjust, SessionState};
