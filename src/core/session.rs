use chrono::NaiveDate;

use super::registry::{LedgerRegistry, ReplacePolicy};
use super::time::{Clock, SystemClock};
use crate::config::Config;
use crate::currency::LocaleConfig;

/// Owned application state for one user session.
///
/// Every operation receives the session explicitly; concurrent sessions each
/// hold their own instance and never share a registry.
pub struct Session {
    registry: LedgerRegistry,
    config: Config,
    locale: LocaleConfig,
    clock: Box<dyn Clock>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Box<dyn Clock>) -> Self {
        let locale = config.locale_config();
        Self {
            registry: LedgerRegistry::new(),
            config,
            locale,
            clock,
        }
    }

    pub fn registry(&self) -> &LedgerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut LedgerRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn locale(&self) -> &LocaleConfig {
        &self.locale
    }

    pub fn replace_policy(&self) -> ReplacePolicy {
        self.config.replace_policy
    }

    pub fn set_replace_policy(&mut self, policy: ReplacePolicy) {
        self.config.replace_policy = policy;
    }

    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;

    #[test]
    fn session_uses_injected_clock_and_config() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 17).unwrap();
        let config = Config {
            grouping_separator: ',',
            ..Config::default()
        };
        let mut session = Session::with_clock(config, Box::new(FixedClock::new(date)));
        assert_eq!(session.today(), date);
        assert_eq!(session.locale().grouping_separator, ',');
        assert!(session.registry().is_empty());

        session.set_replace_policy(ReplacePolicy::UpdateInPlace);
        assert_eq!(session.replace_policy(), ReplacePolicy::UpdateInPlace);
    }
}
