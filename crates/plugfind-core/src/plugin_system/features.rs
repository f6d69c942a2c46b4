use std::collections::HashSet;

/// Lets core plugins be overridden by external installations
pub const FLAG_EXTERNAL_CORE_PLUGINS: &str = "externalCorePlugins";

/// Read-only view of the host's feature toggles
pub trait FeatureToggles: Send + Sync {
    /// Whether `flag` is enabled for every tenant
    fn is_enabled_globally(&self, flag: &str) -> bool;
}

/// Fixed set of enabled flags, decided at construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFeatureToggles {
    enabled: HashSet<String>,
}

impl StaticFeatureToggles {
    /// Toggles with nothing enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `flag` enabled as well
    pub fn with_enabled(mut self, flag: impl Into<String>) -> Self {
        self.enabled.insert(flag.into());
        self
    }

    /// Enabled flag names, in no particular order
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for StaticFeatureToggles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for StaticFeatureToggles {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.enabled.extend(iter.into_iter().map(Into::into));
    }
}

impl FeatureToggles for StaticFeatureToggles {
    fn is_enabled_globally(&self, flag: &str) -> bool {
        self.enabled.contains(flag)
    }
}
