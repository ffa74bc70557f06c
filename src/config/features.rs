//! Feature declarations, suite activation, and the feature-test
//! expression evaluator.
//!
//! The `Features` config section declares every toggleable capability
//! group: a unique name, a default-on flag, and an optional scalar
//! value naming the chosen implementation (e.g. `Sms: { Value:
//! SmsJuhe }`). [`FeaturesSetting::activate`] turns a requested list
//! of names into the immutable [`Suite`] for this run; everything
//! downstream asks the suite questions through [`Suite::cfg_if`] and
//! [`Suite::cfg`] instead of reading configuration directly.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::PatchbayError;

/// One declared feature group.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct FeatureDecl {
    /// Unioned into the suite even when not requested, unless the run
    /// passes `--no-default`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,

    /// The configured implementation choice for this feature, tested by
    /// `Name = Value` expressions and returned by [`Suite::cfg`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// The `Features` section: every feature the configuration declares.
///
/// Feature names are unique by construction (map keys). A `BTreeMap`
/// keeps listings deterministic.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FeaturesSetting(BTreeMap<String, FeatureDecl>);

impl FeaturesSetting {
    pub fn declare(&mut self, name: &str, decl: FeatureDecl) {
        self.0.insert(name.to_string(), decl);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FeatureDecl> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureDecl)> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn declared_names(&self) -> String {
        let names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.join(", ")
    }

    /// Build the suite for this run.
    ///
    /// Every requested name must be declared; an unknown name is a hard
    /// error and no suite is constructed. Unless `no_default` is set,
    /// default-on features are unioned in after the requested ones.
    ///
    /// The returned [`Suite`] is immutable; activation happens once on
    /// the startup path and the suite is then only read.
    pub fn activate(&self, requested: &[String], no_default: bool) -> Result<Suite, PatchbayError> {
        let mut suite = Suite::default();

        for name in requested {
            let decl = self
                .get(name)
                .ok_or_else(|| PatchbayError::UnknownFeature {
                    name: name.clone(),
                    declared: self.declared_names(),
                })?;
            suite.insert(name, decl.value.clone());
        }

        if !no_default {
            for (name, decl) in &self.0 {
                if decl.default {
                    suite.insert(name, decl.value.clone());
                }
            }
        }

        Ok(suite)
    }
}

/// The concrete set of features active for one process run.
#[derive(Debug, Clone, Default)]
pub struct Suite {
    active: HashMap<String, Option<String>>,
    // Activation order, for display only; selection priority comes from
    // each family's candidate list.
    names: Vec<String>,
}

impl Suite {
    fn insert(&mut self, name: &str, value: Option<String>) {
        if !self.active.contains_key(name) {
            self.names.push(name.to_string());
            self.active.insert(name.to_string(), value);
        }
    }

    /// Evaluate a feature-test expression.
    ///
    /// The expression is trimmed and split at the FIRST `=` (the fixed
    /// parse rule for malformed input with multiple `=` signs) into a
    /// feature name and an optional value, both trimmed. The test is
    /// true iff the name is active and, when a value was supplied, the
    /// feature's configured value equals it exactly (case-sensitive).
    ///
    /// Names absent from the suite — including names no configuration
    /// ever declared — evaluate to false without error, so call sites
    /// can probe optional capabilities safely.
    #[must_use]
    pub fn cfg_if(&self, expression: &str) -> bool {
        let expression = expression.trim();
        let (name, value) = match expression.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (expression, None),
        };

        match self.active.get(name) {
            None => false,
            Some(configured) => match value {
                None => true,
                Some(want) => configured.as_deref() == Some(want),
            },
        }
    }

    /// The configured value of an active feature.
    ///
    /// `None` means "not found" (inactive feature, or no value
    /// declared) and is distinct from `Some("")`.
    #[must_use]
    pub fn cfg(&self, key: &str) -> Option<&str> {
        self.active.get(key).and_then(|v| v.as_deref())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    /// Active feature names in activation order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
