//! Installation state: which provisioning steps have completed.
//!
//! The persisted document is JSON of the form
//!
//! ```json
//! { "version": 1, "updated_at": "...", "packages": { "rime": { "ibus-rime": true } } }
//! ```
//!
//! Decoding normalizes the document against the closed `Package`/`Step`
//! enums: known keys missing from the file default to `false`, unknown keys
//! are dropped and reported back to the caller.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::StateFormatError;

/// Highest state document version this build understands.
pub const STATE_VERSION: u32 = 1;

// ── Packages and steps ───────────────────────────────────────────────────────

/// A package group: a named collection of related steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Package {
    /// The ibus-rime input method and its plum schema manager.
    Rime,
}

impl Package {
    pub const ALL: &'static [Package] = &[Package::Rime];

    /// Steps of this package, in execution order.
    #[must_use]
    pub fn steps(self) -> &'static [Step] {
        match self {
            Package::Rime => &[Step::IbusRime, Step::ConfigPath, Step::Plum],
        }
    }

    /// Key used in the persisted state document.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Package::Rime => "rime",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.key() == key)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One idempotent provisioning action tracked by a completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Install the `ibus-rime` system package.
    IbusRime,
    /// Create the rime configuration directory.
    ConfigPath,
    /// Clone plum and install the input schema.
    Plum,
}

impl Step {
    pub const ALL: &'static [Step] = &[Step::IbusRime, Step::ConfigPath, Step::Plum];

    /// The package group this step belongs to.
    #[must_use]
    pub fn package(self) -> Package {
        match self {
            Step::IbusRime | Step::ConfigPath | Step::Plum => Package::Rime,
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Step::IbusRime => "ibus-rime",
            Step::ConfigPath => "config-path",
            Step::Plum => "plum",
        }
    }

    /// Looks up a step of `package` by its persisted key.
    #[must_use]
    pub fn from_key(package: Package, key: &str) -> Option<Self> {
        package.steps().iter().copied().find(|s| s.key() == key)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── State ────────────────────────────────────────────────────────────────────

/// Completion flags for every known step.
///
/// Flags only ever move from `false` to `true`; there is no operation that
/// clears one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationState {
    flags: BTreeMap<Step, bool>,
    updated_at: Option<DateTime<Utc>>,
}

/// Result of decoding a persisted document.
#[derive(Debug)]
pub struct DecodedState {
    pub state: InstallationState,
    /// Unknown `package` or `package.step` keys that were dropped.
    pub dropped_keys: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct StateDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    packages: BTreeMap<String, BTreeMap<String, bool>>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for InstallationState {
    fn default() -> Self {
        Self::fresh()
    }
}

impl InstallationState {
    /// A state with every known step pending.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            flags: Step::ALL.iter().map(|&s| (s, false)).collect(),
            updated_at: None,
        }
    }

    #[must_use]
    pub fn is_done(&self, step: Step) -> bool {
        self.flags.get(&step).copied().unwrap_or(false)
    }

    pub fn mark_done(&mut self, step: Step) {
        self.flags.insert(step, true);
    }

    /// When the state was last persisted, if it ever was.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Steps of `package` with their flags, in execution order.
    pub fn package_flags(&self, package: Package) -> impl Iterator<Item = (Step, bool)> + '_ {
        package.steps().iter().map(|&s| (s, self.is_done(s)))
    }

    /// Nested `package -> step -> done` view keyed by persisted names.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, BTreeMap<String, bool>> {
        Package::ALL
            .iter()
            .map(|&p| {
                let steps = self
                    .package_flags(p)
                    .map(|(s, done)| (s.key().to_string(), done))
                    .collect();
                (p.key().to_string(), steps)
            })
            .collect()
    }

    /// Decode a persisted document, applying the migration rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a valid state document or
    /// declares a version newer than [`STATE_VERSION`].
    pub fn decode(content: &str) -> Result<DecodedState, StateFormatError> {
        let doc: StateDocument = serde_json::from_str(content)?;
        if doc.version > STATE_VERSION {
            return Err(StateFormatError::UnsupportedVersion {
                found: doc.version,
                supported: STATE_VERSION,
            });
        }

        let mut state = Self::fresh();
        state.updated_at = doc.updated_at;
        let mut dropped_keys = Vec::new();

        for (package_key, steps) in doc.packages {
            let Some(package) = Package::from_key(&package_key) else {
                dropped_keys.push(package_key);
                continue;
            };
            for (step_key, done) in steps {
                match Step::from_key(package, &step_key) {
                    Some(step) if done => state.mark_done(step),
                    Some(_) => {}
                    None => dropped_keys.push(format!("{package_key}.{step_key}")),
                }
            }
        }

        Ok(DecodedState {
            state,
            dropped_keys,
        })
    }

    /// Encode the state as a pretty-printed document stamped with `saved_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self, saved_at: DateTime<Utc>) -> Result<String, serde_json::Error> {
        let doc = StateDocument {
            version: STATE_VERSION,
            updated_at: Some(saved_at),
            packages: self.to_map(),
        };
        serde_json::to_string_pretty(&doc)
    }
}
