//! Device configuration.

/// Optional checks performed around each forwarded call.
///
/// The defaults follow the `extra-error-checks` and `extra-param-checks`
/// Cargo features. Only error checks are enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Query `glGetError` after every call and report failures.
    pub extra_error_checks: bool,
    /// Log a warning when a `-1` location is passed in.
    pub extra_param_checks: bool,
}

impl DeviceConfig {
    /// No checks at all. Calls are forwarded untouched.
    pub const fn unchecked() -> Self {
        Self {
            extra_error_checks: false,
            extra_param_checks: false,
        }
    }

    pub fn with_error_checks(mut self, enabled: bool) -> Self {
        self.extra_error_checks = enabled;
        self
    }

    pub fn with_param_checks(mut self, enabled: bool) -> Self {
        self.extra_param_checks = enabled;
        self
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            extra_error_checks: cfg!(feature = "extra-error-checks"),
            extra_param_checks: cfg!(feature = "extra-param-checks"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = DeviceConfig::default()
            .with_error_checks(false)
            .with_param_checks(true);
        assert!(!config.extra_error_checks);
        assert!(config.extra_param_checks);
        assert_eq!(
            DeviceConfig::unchecked(),
            DeviceConfig::default()
                .with_error_checks(false)
                .with_param_checks(false)
        );
    }

    #[test]
    fn test_default_follows_features() {
        let config = DeviceConfig::default();
        assert_eq!(config.extra_error_checks, cfg!(feature = "extra-error-checks"));
        assert_eq!(config.extra_param_checks, cfg!(feature = "extra-param-checks"));
    }
}
