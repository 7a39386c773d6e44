//! First-failure-wins register shared by the workers of one call

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Failure surfaced by [`ParallelMapper::try_map`](super::ParallelMapper::try_map).
///
/// Carries the index of the element that failed. When several workers fail
/// at nearly the same time, whichever records its failure first is reported.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError<E> {
    #[error("transform failed on element {index}: {cause}")]
    Transform { index: usize, cause: E },

    #[error("transform panicked on element {index}: {message}")]
    Panicked { index: usize, message: String },
}

impl<E> MapError<E> {
    /// Index of the input element whose transform failed
    pub fn index(&self) -> usize {
        match self {
            Self::Transform { index, .. } | Self::Panicked { index, .. } => *index,
        }
    }
}

pub(crate) enum FailureCause<E> {
    Error(E),
    Panic(Box<dyn Any + Send + 'static>),
}

pub(crate) struct Failure<E> {
    pub index: usize,
    pub cause: FailureCause<E>,
}

impl<E> Failure<E> {
    pub fn into_map_error(self) -> MapError<E> {
        match self.cause {
            FailureCause::Error(cause) => MapError::Transform {
                index: self.index,
                cause,
            },
            FailureCause::Panic(payload) => MapError::Panicked {
                index: self.index,
                message: panic_message(payload.as_ref()),
            },
        }
    }
}

/// Atomic stop flag plus a single-assignment slot for the first failure.
pub(crate) struct FailureRegister<E> {
    raised: AtomicBool,
    first: Mutex<Option<Failure<E>>>,
}

impl<E> FailureRegister<E> {
    pub fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
            first: Mutex::new(None),
        }
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Raise the flag and keep `failure` if no other failure got there first.
    ///
    /// Returns whether this failure is the one that will be reported.
    pub fn record(&self, failure: Failure<E>) -> bool {
        self.raised.store(true, Ordering::Release);

        let mut slot = self.first.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(failure);
        true
    }

    pub fn into_first(self) -> Option<Failure<E>> {
        self.first
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
