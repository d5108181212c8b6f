// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Aggregation of independent failures.
//!
//! Graph validation and key store unlocking both run a series of checks that
//! can fail independently of each other. Rather than stopping at the first
//! failure they push every cause into an [`ErrorAccumulator`], which yields
//! either "no failure" or a single [`MultiError`] describing all of them.

use std::fmt;

/// One or more failures reported together.
///
/// A `MultiError` is never empty: it is only produced by
/// [`ErrorAccumulator::finish`] when at least one error was collected.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiError<E> {
    errors: Vec<E>,
}

impl<E> MultiError<E> {
    /// All collected errors, in the order they were recorded.
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.errors.iter()
    }

    pub fn into_inner(self) -> Vec<E> {
        self.errors
    }
}

impl<E: fmt::Display> fmt::Display for MultiError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.errors.as_slice() {
            return write!(f, "{}", single);
        }

        write!(f, "{} errors occurred:", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n\t* {}", error)?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for MultiError<E> {}

impl<E> IntoIterator for MultiError<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a MultiError<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Collects zero or more failure causes from independent fallible steps.
///
/// # Example
/// ```
/// use pipeline_core::errors::ErrorAccumulator;
///
/// let mut errors = ErrorAccumulator::new();
/// let parsed: Option<i32> = errors.absorb("42".parse::<i32>().map_err(|e| e.to_string()));
/// errors.absorb("nope".parse::<i32>().map_err(|e| e.to_string()));
///
/// assert_eq!(parsed, Some(42));
/// assert_eq!(errors.finish().unwrap_err().len(), 1);
/// ```
#[derive(Debug)]
pub struct ErrorAccumulator<E> {
    errors: Vec<E>,
}

impl<E> Default for ErrorAccumulator<E> {
    fn default() -> Self {
        Self { errors: Vec::new() }
    }
}

impl<E> ErrorAccumulator<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single failure.
    pub fn push(&mut self, error: E) {
        self.errors.push(error);
    }

    /// Record every failure yielded by `errors`.
    pub fn extend<I: IntoIterator<Item = E>>(&mut self, errors: I) {
        self.errors.extend(errors);
    }

    /// Keep the success value of `result`, recording its error otherwise.
    pub fn absorb<T>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(())` when nothing failed, otherwise every recorded failure.
    pub fn finish(self) -> Result<(), MultiError<E>> {
        self.finish_with(())
    }

    /// Like [`finish`](Self::finish) but hands back `value` on success.
    pub fn finish_with<T>(self, value: T) -> Result<T, MultiError<E>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(MultiError {
                errors: self.errors,
            })
        }
    }
}
