//! Backend selection protocol.
//!
//! Every pluggable capability family (object storage, SQL driver, SMS
//! gateway, search index) is wired the same way: an ordered list of
//! `(feature test, constructor)` candidates is walked in declaration
//! order, and the first candidate whose feature test matches the active
//! suite is constructed. Ambiguous suites (two storage features active
//! at once) therefore resolve to the earlier candidate, predictably,
//! never arbitrarily. A family may designate a default constructor for
//! the no-match case; without one, no match is an error.

use semver::Version;

use crate::config::features::Suite;
use crate::error::PatchbayError;

/// Static identity reported by every constructed backend.
///
/// The name and version are diagnostics and forward-compatibility
/// levers (a servant may consult its own version to decide legacy
/// behavior); they never participate in selection.
pub trait Servant {
    fn name(&self) -> &'static str;
    fn version(&self) -> Version;
}

type Constructor<'a, T> = Box<dyn FnOnce() -> Result<T, PatchbayError> + 'a>;

pub struct BackendSelector<'a, T> {
    family: &'static str,
    candidates: Vec<(&'static str, Constructor<'a, T>)>,
    fallback: Option<(&'static str, Constructor<'a, T>)>,
}

impl<'a, T> BackendSelector<'a, T> {
    #[must_use]
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            candidates: Vec::new(),
            fallback: None,
        }
    }

    /// Register a candidate. Order of registration is selection priority.
    #[must_use]
    pub fn when(
        mut self,
        test: &'static str,
        build: impl FnOnce() -> Result<T, PatchbayError> + 'a,
    ) -> Self {
        self.candidates.push((test, Box::new(build)));
        self
    }

    /// Designate the constructor used when no candidate test matches.
    #[must_use]
    pub fn or_default(
        mut self,
        label: &'static str,
        build: impl FnOnce() -> Result<T, PatchbayError> + 'a,
    ) -> Self {
        self.fallback = Some((label, Box::new(build)));
        self
    }

    /// Evaluate candidates in order against `suite` and construct the
    /// first match (or the default). Selection is deterministic given
    /// the suite.
    pub fn select(self, suite: &Suite) -> Result<T, PatchbayError> {
        for (test, build) in self.candidates {
            if suite.cfg_if(test) {
                tracing::debug!(family = self.family, candidate = test, "backend selected");
                return build();
            }
        }

        if let Some((label, build)) = self.fallback {
            tracing::debug!(
                family = self.family,
                candidate = label,
                "no candidate matched, using default backend"
            );
            return build();
        }

        Err(PatchbayError::NoBackend {
            family: self.family,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::features::FeaturesSetting;

    fn suite_of(names: &[&str]) -> Suite {
        let mut declared = FeaturesSetting::default();
        for name in names {
            declared.declare(name, Default::default());
        }
        let requested: Vec<String> = names.iter().map(|n| (*n).to_string()).collect();
        declared.activate(&requested, true).unwrap()
    }

    #[test]
    fn first_match_wins() {
        let suite = suite_of(&["Postgres"]);
        let picked = BackendSelector::new("sql driver")
            .when("MySQL", || Ok("a"))
            .when("Postgres", || Ok("b"))
            .or_default("MySQL", || Ok("a"))
            .select(&suite)
            .unwrap();
        assert_eq!(picked, "b");
    }

    #[test]
    fn earlier_candidate_beats_later_when_both_match() {
        let suite = suite_of(&["MySQL", "Postgres"]);
        let picked = BackendSelector::new("sql driver")
            .when("MySQL", || Ok("a"))
            .when("Postgres", || Ok("b"))
            .select(&suite)
            .unwrap();
        assert_eq!(picked, "a");
    }

    #[test]
    fn default_used_when_nothing_matches() {
        let suite = suite_of(&["LocalOSS"]);
        let picked = BackendSelector::new("sql driver")
            .when("MySQL", || Ok("a"))
            .when("Postgres", || Ok("b"))
            .or_default("MySQL", || Ok("default"))
            .select(&suite)
            .unwrap();
        assert_eq!(picked, "default");
    }

    #[test]
    fn no_match_and_no_default_is_an_error() {
        let suite = suite_of(&["LocalOSS"]);
        let result: Result<&str, _> = BackendSelector::new("sms gateway")
            .when("Sms = SmsJuhe", || Ok("juhe"))
            .select(&suite);
        assert!(matches!(result, Err(PatchbayError::NoBackend { family }) if family == "sms gateway"));
    }

    #[test]
    fn constructor_error_propagates() {
        let suite = suite_of(&["MySQL"]);
        let result: Result<&str, _> = BackendSelector::new("sql driver")
            .when("MySQL", || {
                Err(PatchbayError::BackendUnavailable {
                    backend: "MySQL",
                    hint: "rebuild with --features mysql",
                })
            })
            .select(&suite);
        assert!(matches!(
            result,
            Err(PatchbayError::BackendUnavailable { backend: "MySQL", .. })
        ));
    }
}
