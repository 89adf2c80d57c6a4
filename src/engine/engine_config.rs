use std::path::PathBuf;

/// A configuration object for running the CABEAN engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// The engine executable (default: `cabean`, resolved through `PATH`).
    pub executable: PathBuf,
    /// Options inserted after the fixed flags of every invocation.
    pub extra_options: Vec<String>,
    /// Echo the raw engine output at the `info` level and keep the temporary input
    /// files instead of deleting them.
    pub debug: bool,
    /// Compare the attractor listing of every control query with the listing seen
    /// first, and repeat the query once if the engine renumbered the attractors.
    ///
    /// Disable this if attractor indices are known to be stable for your engine build.
    pub check_index_stability: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::new("cabean")
    }
}

impl EngineConfig {
    /// Create a new instance of [`EngineConfig`] for the given executable, with
    /// the index stability check enabled.
    pub fn new<P: Into<PathBuf>>(executable: P) -> EngineConfig {
        EngineConfig {
            executable: executable.into(),
            extra_options: Vec::new(),
            debug: false,
            check_index_stability: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;
    use std::path::Path;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.executable, Path::new("cabean"));
        assert!(config.check_index_stability);
        assert!(!config.debug);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_json() {
        let mut config = EngineConfig::new("/opt/cabean/bin/cabean");
        config.extra_options = vec!["-compositional".to_string(), "1".to_string()];
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
