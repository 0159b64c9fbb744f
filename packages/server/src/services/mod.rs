//! Store-facing voting core.
//!
//! Each service borrows a connection (pool or transaction) and owns no state
//! across calls. Handlers perform authorization before calling in; the
//! services trust the ids they are given.

pub mod contestant;
pub mod ledger;
pub mod results;
pub mod roster;
pub mod round;

pub use contestant::ContestantService;
pub use ledger::VoteLedger;
pub use results::ResultsAggregator;
pub use roster::Roster;
pub use round::RoundService;
