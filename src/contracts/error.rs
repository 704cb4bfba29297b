use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SysrefError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),
}

/// Extension trait for converting lock errors to SequenceError.
pub trait LockResultExt<T> {
    /// Converts a lock error to a SequenceError.
    fn map_lock_err(self) -> Result<T, SequenceError>;
}

impl<'a, T> LockResultExt<RwLockReadGuard<'a, T>>
    for Result<RwLockReadGuard<'a, T>, PoisonError<RwLockReadGuard<'a, T>>>
{
    #[inline]
    fn map_lock_err(self) -> Result<RwLockReadGuard<'a, T>, SequenceError> {
        self.map_err(|e| SequenceError::LockPoisoned(e.to_string()))
    }
}

impl<'a, T> LockResultExt<RwLockWriteGuard<'a, T>>
    for Result<RwLockWriteGuard<'a, T>, PoisonError<RwLockWriteGuard<'a, T>>>
{
    #[inline]
    fn map_lock_err(self) -> Result<RwLockWriteGuard<'a, T>, SequenceError> {
        self.map_err(|e| SequenceError::LockPoisoned(e.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Locale not found: {0}")]
    LocaleNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("Failed to create sequence {name}: {reason}")]
    CreateFailed { name: String, reason: String },

    #[error("Sequence not found: {0}")]
    Missing(String),

    #[error("Sequence overflow")]
    Overflow,

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
