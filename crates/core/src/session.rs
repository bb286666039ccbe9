//! Scan session state
//!
//! One [`ScanSession`] owns the state of the scan flow as immutable
//! [`ScanState`] snapshots. Every scan gets a fresh [`ScanToken`]; a lookup
//! result is applied only if it carries the token of the scan that is still
//! current, so a slow response for an earlier barcode can never overwrite the
//! state of a newer scan.

use crate::product::{LookupError, ProductRecord};
use crate::safety::SafetyVerdict;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Identifies one scan within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScanToken(u64);

impl fmt::Display for ScanToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of the scan flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ScanState {
    /// Nothing scanned, or the last result was dismissed
    Idle,
    /// Lookup in flight
    Loading {
        /// Scan the lookup belongs to
        token: ScanToken,
        /// Barcode being looked up
        barcode: String,
    },
    /// Product found and evaluated
    Loaded {
        /// Scan the result belongs to
        token: ScanToken,
        /// Scanned barcode
        barcode: String,
        /// Product returned by the lookup
        product: ProductRecord,
        /// Verdict for the selection at evaluation time
        verdict: SafetyVerdict,
    },
    /// Lookup failed
    Failed {
        /// Scan the failure belongs to
        token: ScanToken,
        /// Scanned barcode
        barcode: String,
        /// Why no product was returned
        error: LookupError,
    },
}

impl ScanState {
    /// Token of the scan this snapshot belongs to
    #[must_use]
    pub fn token(&self) -> Option<ScanToken> {
        match self {
            Self::Idle => None,
            Self::Loading { token, .. }
            | Self::Loaded { token, .. }
            | Self::Failed { token, .. } => Some(*token),
        }
    }

    /// Whether a lookup is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// State container for one scanning session
#[derive(Debug)]
pub struct ScanSession {
    state: ScanState,
    next_token: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    /// Create an idle session
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
            next_token: 1,
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Token of the scan still awaiting or holding a result
    #[must_use]
    pub fn current_token(&self) -> Option<ScanToken> {
        self.state.token()
    }

    /// Start a scan, dropping any previous product or error
    pub fn begin(&mut self, barcode: impl Into<String>) -> ScanToken {
        let token = self.issue_token();
        let barcode = barcode.into();
        debug!(token = %token, barcode = %barcode, "Scan started");
        self.state = ScanState::Loading { token, barcode };
        token
    }

    /// Apply a lookup result
    ///
    /// Returns `false` (and leaves the state untouched) when `token` is not
    /// the scan currently loading.
    pub fn complete(
        &mut self,
        token: ScanToken,
        result: Result<ProductRecord, LookupError>,
        selected: &BTreeSet<String>,
    ) -> bool {
        let barcode = match &self.state {
            ScanState::Loading { token: current, barcode } if *current == token => barcode.clone(),
            _ => {
                debug!(token = %token, current = ?self.current_token(), "Discarding stale lookup result");
                return false;
            }
        };

        self.state = match result {
            Ok(product) => {
                let verdict = product.verdict(selected);
                ScanState::Loaded {
                    token,
                    barcode,
                    product,
                    verdict,
                }
            }
            Err(error) => ScanState::Failed {
                token,
                barcode,
                error,
            },
        };
        true
    }

    /// Recompute the verdict of a loaded product after the selection changed
    pub fn reevaluate(&mut self, selected: &BTreeSet<String>) {
        if let ScanState::Loaded {
            product, verdict, ..
        } = &mut self.state
        {
            *verdict = product.verdict(selected);
        }
    }

    /// Dismiss the current result and invalidate any in-flight scan
    pub fn clear(&mut self) {
        // Burn a token so a pending completion can never match again
        self.issue_token();
        self.state = ScanState::Idle;
    }

    fn issue_token(&mut self) -> ScanToken {
        let token = ScanToken(self.next_token);
        self.next_token += 1;
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn milk_product(barcode: &str) -> ProductRecord {
        ProductRecord {
            allergen_tags: Some(vec!["en:milk".to_string()]),
            ..ProductRecord::new(barcode)
        }
    }

    #[test]
    fn test_starts_idle() {
        let session = ScanSession::new();
        assert_eq!(session.state(), &ScanState::Idle);
        assert!(session.current_token().is_none());
    }

    #[test]
    fn test_begin_then_complete() {
        let mut session = ScanSession::new();
        let token = session.begin("123");
        assert!(session.state().is_loading());

        assert!(session.complete(token, Ok(milk_product("123")), &selected(&["en:milk"])));

        match session.state() {
            ScanState::Loaded {
                barcode, verdict, ..
            } => {
                assert_eq!(barcode, "123");
                assert!(verdict.is_unsafe());
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn test_failure_is_recorded() {
        let mut session = ScanSession::new();
        let token = session.begin("404");
        assert!(session.complete(token, Err(LookupError::NotFound), &BTreeSet::new()));

        assert!(matches!(
            session.state(),
            ScanState::Failed { error: LookupError::NotFound, .. }
        ));
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut session = ScanSession::new();
        let first = session.begin("111");
        let second = session.begin("222");
        assert_ne!(first, second);

        assert!(!session.complete(first, Ok(milk_product("111")), &BTreeSet::new()));
        assert!(session.state().is_loading());
        assert_eq!(session.current_token(), Some(second));

        assert!(session.complete(second, Err(LookupError::ServerError(500)), &BTreeSet::new()));
        // A late duplicate for the same token must not overwrite the result either
        assert!(!session.complete(second, Ok(milk_product("222")), &BTreeSet::new()));
        assert!(matches!(session.state(), ScanState::Failed { .. }));
    }

    #[test]
    fn test_new_scan_clears_previous_result() {
        let mut session = ScanSession::new();
        let token = session.begin("111");
        session.complete(token, Ok(milk_product("111")), &BTreeSet::new());

        session.begin("222");
        assert!(matches!(
            session.state(),
            ScanState::Loading { barcode, .. } if barcode == "222"
        ));
    }

    #[test]
    fn test_clear_invalidates_in_flight_scan() {
        let mut session = ScanSession::new();
        let token = session.begin("111");
        session.clear();

        assert!(!session.complete(token, Ok(milk_product("111")), &BTreeSet::new()));
        assert_eq!(session.state(), &ScanState::Idle);
    }

    #[test]
    fn test_reevaluate_after_selection_change() {
        let mut session = ScanSession::new();
        let token = session.begin("123");
        session.complete(token, Ok(milk_product("123")), &BTreeSet::new());

        assert!(matches!(
            session.state(),
            ScanState::Loaded { verdict: SafetyVerdict::Safe, .. }
        ));

        session.reevaluate(&selected(&["en:milk"]));
        assert!(matches!(
            session.state(),
            ScanState::Loaded { verdict: SafetyVerdict::Unsafe(_), .. }
        ));
    }
}
