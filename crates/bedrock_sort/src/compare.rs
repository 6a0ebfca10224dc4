//! # Comparator Validation
//!
//! Every algorithm in this crate calls its "less" predicate through
//! [`Comparator`]. When validation is on, each time the predicate answers
//! `less(a, b) == true` the wrapper also asks `less(b, a)`; a second `true`
//! is an antisymmetry violation.
//!
//! Violations are counted and the first one per call is logged with
//! `tracing::warn!`. They never abort the sort: the algorithms bound every
//! scan, so a broken predicate only yields an unspecified order.

use crate::error::{SortError, SortResult};

/// A "less" predicate plus optional antisymmetry checking.
pub(crate) struct Comparator<F> {
    /// The caller's predicate.
    less: F,
    /// Whether to double-check `true` answers.
    validate: bool,
    /// Antisymmetry violations seen so far.
    violations: usize,
}

impl<F> Comparator<F> {
    /// Wraps `less`, validating in debug builds only.
    #[inline]
    pub(crate) fn new(less: F) -> Self {
        Self::with_validation(less, cfg!(debug_assertions))
    }

    /// Wraps `less`, always validating.
    #[inline]
    pub(crate) fn validating(less: F) -> Self {
        Self::with_validation(less, true)
    }

    #[inline]
    const fn with_validation(less: F, validate: bool) -> Self {
        Self {
            less,
            validate,
            violations: 0,
        }
    }

    /// Calls the predicate.
    #[inline]
    pub(crate) fn less<T>(&mut self, a: &T, b: &T) -> bool
    where
        F: FnMut(&T, &T) -> bool,
    {
        let ordered = (self.less)(a, b);
        if ordered && self.validate && (self.less)(b, a) {
            self.record_violation();
        }
        ordered
    }

    /// Violations seen so far.
    #[inline]
    pub(crate) const fn violations(&self) -> usize {
        self.violations
    }

    /// `Ok` if no violation was seen.
    pub(crate) fn finish(&self) -> SortResult<()> {
        match self.violations {
            0 => Ok(()),
            violations => Err(SortError::ComparatorViolation { violations }),
        }
    }

    #[cold]
    fn record_violation(&mut self) {
        if self.violations == 0 {
            tracing::warn!("comparator is not a strict weak ordering: less(a, b) and less(b, a) both hold");
        }
        self.violations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_predicate_has_no_violations() {
        let mut cmp = Comparator::validating(|a: &i32, b: &i32| a < b);
        assert!(cmp.less(&1, &2));
        assert!(!cmp.less(&2, &1));
        assert!(!cmp.less(&2, &2));
        assert_eq!(cmp.finish(), Ok(()));
    }

    #[test]
    fn test_non_strict_predicate_is_counted() {
        let mut cmp = Comparator::validating(|a: &i32, b: &i32| a <= b);
        assert!(cmp.less(&3, &3));
        assert!(cmp.less(&4, &4));
        assert!(cmp.less(&1, &2));
        assert_eq!(cmp.violations(), 2);
        assert_eq!(cmp.finish(), Err(SortError::ComparatorViolation { violations: 2 }));
    }

    #[test]
    fn test_validation_off_never_double_checks() {
        let mut calls = 0;
        let mut cmp = Comparator::with_validation(
            |a: &i32, b: &i32| {
                calls += 1;
                a <= b
            },
            false,
        );
        assert!(cmp.less(&3, &3));
        assert_eq!(cmp.violations(), 0);
        drop(cmp);
        assert_eq!(calls, 1);
    }
}
