//! command-dispatch: from a classified utterance to a spoken response
//!
//! [`Dispatcher`] runs one handler per intent and owns the single-slot
//! confirmation guard for shutdown and restart. [`Session`] sits in front of
//! it and applies wake-word gating, confirmation follow-ups and expiry.

mod error;
pub use error::{DispatchError, Result};

mod actions;
pub use actions::{ActionTag, Response, NOT_UNDERSTOOD};

mod confirmation;
pub use confirmation::{ConfirmationState, CriticalOperation, Transition};

mod clock;
pub use clock::{Clock, FixedClock, SystemClock};

mod dispatcher;
pub use dispatcher::{Dispatcher, DispatcherConfig, FeatureFlags};

mod session;
pub use session::{is_affirmative, Session, SessionConfig, AFFIRMATIVE_WORDS};

/// Initialize the dispatch layer
pub fn init() -> Result<()> {
    intent_parser::init()?;
    tracing::info!("Initializing command dispatch");
    Ok(())
}
