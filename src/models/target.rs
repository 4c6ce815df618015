use std::collections::BTreeMap;

/// Configuration values for an environment, keyed by `namespace:key` style names.
pub type ConfigMap = BTreeMap<String, String>;

/// A named environment and its desired configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub config: ConfigMap,
}

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: ConfigMap::new(),
        }
    }

    pub fn with_config(mut self, config: ConfigMap) -> Self {
        self.config = config;
        self
    }

    /// Set a single configuration value, returning the previous one.
    pub fn set_config(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.config.insert(key.into(), value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_config_replaces_value() {
        let mut target = Target::new("prod");
        assert_eq!(target.set_config("aws:region", "us-east-1"), None);
        assert_eq!(
            target.set_config("aws:region", "eu-west-1"),
            Some("us-east-1".to_string())
        );
        assert_eq!(target.config["aws:region"], "eu-west-1");
    }
}
