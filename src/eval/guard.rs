//! Cancellation and deadline checks at call-site boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{DispatchError, RepairError};

/// Why a guarded call stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interrupt {
    Cancelled,
    TimedOut { limit_ms: u64 },
}

impl From<Interrupt> for DispatchError {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Cancelled => Self::Cancelled,
            Interrupt::TimedOut { limit_ms } => Self::TimedOut { limit_ms },
        }
    }
}

impl From<Interrupt> for RepairError {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Cancelled => Self::Cancelled,
            Interrupt::TimedOut { limit_ms } => Self::TimedOut { limit_ms },
        }
    }
}

/// Cancel flag plus optional deadline for one candidate.
pub(crate) struct CallGuard<'a> {
    cancel: Option<&'a AtomicBool>,
    deadline: Option<(Instant, u64)>,
}

impl<'a> CallGuard<'a> {
    /// A guard that never trips.
    pub(crate) fn unbounded() -> Self {
        Self {
            cancel: None,
            deadline: None,
        }
    }

    /// Starts the clock now.
    pub(crate) fn new(cancel: Option<&'a AtomicBool>, time_limit_ms: Option<u64>) -> Self {
        Self {
            cancel,
            deadline: time_limit_ms.map(|ms| (Instant::now() + Duration::from_millis(ms), ms)),
        }
    }

    pub(crate) fn check(&self) -> Result<(), Interrupt> {
        if let Some(flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(Interrupt::Cancelled);
            }
        }
        if let Some((deadline, limit_ms)) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Interrupt::TimedOut { limit_ms });
            }
        }
        Ok(())
    }
}
