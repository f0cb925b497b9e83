//! Ledger ownership, persistence wiring and time handling.

pub mod clock;
pub mod ledger_manager;
pub mod zone;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger_manager::LedgerManager;
pub use zone::{ZoneParseError, ZonePolicy};
