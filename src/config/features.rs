//! Feature flags for optional server behavior.

/// Feature flags for controlling optional docchat behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Send permissive CORS headers so the viewer can run on another origin.
    pub cors: bool,
    /// Delay every request by a random amount to imitate a real backend.
    pub simulated_delay: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::all()
    }
}

impl FeatureFlags {
    /// Creates feature flags with all features enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            cors: true,
            simulated_delay: true,
        }
    }
}
