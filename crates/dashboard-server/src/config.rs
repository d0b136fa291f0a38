use std::{
    env,
    net::{AddrParseError, SocketAddr},
};

use core_sim::SimConfig;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

const ADDR_KEY: &str = "DASHBOARD_ADDR";
const PIN_KEY: &str = "DASHBOARD_PIN";
const SESSION_KEY_KEY: &str = "DASHBOARD_SESSION_KEY";
const TRADE_PROBABILITY_KEY: &str = "DASHBOARD_TRADE_PROBABILITY";
const OPEN_PROBABILITY_KEY: &str = "DASHBOARD_OPEN_PROBABILITY";
const CLOSE_PROBABILITY_KEY: &str = "DASHBOARD_CLOSE_PROBABILITY";
const RNG_SEED_KEY: &str = "DASHBOARD_RNG_SEED";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub pin: String,
    pub session_key: String,
    pub trade_probability: f64,
    pub open_probability: f64,
    pub close_probability: f64,
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DASHBOARD_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("DASHBOARD_PIN must not be empty or contain whitespace")]
    InvalidPin,
    #[error("DASHBOARD_SESSION_KEY must not be empty")]
    InvalidSessionKey,
    #[error("{0} must be a finite probability between 0 and 1")]
    InvalidProbability(&'static str),
    #[error("DASHBOARD_RNG_SEED must be an unsigned 64-bit integer")]
    InvalidRngSeed,
    #[error("{0} contains non-unicode data")]
    NonUnicode(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match env::var(ADDR_KEY) {
            Ok(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            Err(env::VarError::NotPresent) => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicode(ADDR_KEY));
            }
        };

        let pin = match env::var(PIN_KEY) {
            Ok(value) => {
                if value.is_empty() || value.chars().any(char::is_whitespace) {
                    return Err(ConfigError::InvalidPin);
                }
                value
            }
            Err(env::VarError::NotPresent) => api::DEFAULT_PIN.to_owned(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicode(PIN_KEY));
            }
        };

        let session_key = match env::var(SESSION_KEY_KEY) {
            Ok(value) => {
                if value.is_empty() {
                    return Err(ConfigError::InvalidSessionKey);
                }
                value
            }
            Err(env::VarError::NotPresent) => api::DEFAULT_SESSION_KEY.to_owned(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicode(SESSION_KEY_KEY));
            }
        };

        let defaults = SimConfig::default();
        let trade_probability =
            parse_probability_env(TRADE_PROBABILITY_KEY, defaults.trade_probability)?;
        let open_probability =
            parse_probability_env(OPEN_PROBABILITY_KEY, defaults.open_probability)?;
        let close_probability =
            parse_probability_env(CLOSE_PROBABILITY_KEY, defaults.close_probability)?;

        let rng_seed = match env::var(RNG_SEED_KEY) {
            Ok(value) => {
                let seed = value
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidRngSeed)?;
                Some(seed)
            }
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicode(RNG_SEED_KEY));
            }
        };

        Ok(Self {
            listen_addr,
            pin,
            session_key,
            trade_probability,
            open_probability,
            close_probability,
            rng_seed,
        })
    }

    /// Simulation parameters with the probability overrides applied.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            trade_probability: self.trade_probability,
            open_probability: self.open_probability,
            close_probability: self.close_probability,
            ..SimConfig::default()
        }
    }
}

fn parse_probability_env(key: &'static str, default_value: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(value) => {
            let parsed = value
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidProbability(key))?;
            if !parsed.is_finite() || !(0.0..=1.0).contains(&parsed) {
                return Err(ConfigError::InvalidProbability(key));
            }
            Ok(parsed)
        }
        Err(env::VarError::NotPresent) => Ok(default_value),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Mutex};

    use super::{
        Config, ConfigError, ADDR_KEY, CLOSE_PROBABILITY_KEY, OPEN_PROBABILITY_KEY, PIN_KEY,
        RNG_SEED_KEY, SESSION_KEY_KEY, TRADE_PROBABILITY_KEY,
    };

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn unset(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }

        #[cfg(unix)]
        fn set_os(key: &'static str, value: std::ffi::OsString) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.previous.take() {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn reset_config_env_baseline() -> [EnvVarGuard; 7] {
        [
            EnvVarGuard::unset(ADDR_KEY),
            EnvVarGuard::unset(PIN_KEY),
            EnvVarGuard::unset(SESSION_KEY_KEY),
            EnvVarGuard::unset(TRADE_PROBABILITY_KEY),
            EnvVarGuard::unset(OPEN_PROBABILITY_KEY),
            EnvVarGuard::unset(CLOSE_PROBABILITY_KEY),
            EnvVarGuard::unset(RNG_SEED_KEY),
        ]
    }

    #[test]
    fn defaults_when_env_is_unset() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.pin, "260914");
        assert_eq!(config.trade_probability, 0.2);
        assert_eq!(config.open_probability, 0.1);
        assert_eq!(config.close_probability, 0.05);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn uses_listen_address_override_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ADDR_KEY, "127.0.0.1:9090");

        let config = Config::from_env().unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9090".parse().unwrap());
    }

    #[test]
    fn returns_error_for_invalid_listen_address_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(ADDR_KEY, "not-an-addr");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidListenAddr(_)));
    }

    #[test]
    fn rejects_blank_or_spaced_pin() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        for value in ["", "12 34"] {
            let _guard = EnvVarGuard::set(PIN_KEY, value);
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPin), "{value:?}");
        }
    }

    #[test]
    fn rejects_empty_session_key() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(SESSION_KEY_KEY, "");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidSessionKey));
    }

    #[test]
    fn probability_overrides_flow_into_sim_config() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _trade = EnvVarGuard::set(TRADE_PROBABILITY_KEY, "1");
        let _open = EnvVarGuard::set(OPEN_PROBABILITY_KEY, "0");

        let sim = Config::from_env().unwrap().sim_config();

        assert_eq!(sim.trade_probability, 1.0);
        assert_eq!(sim.open_probability, 0.0);
        assert_eq!(sim.close_probability, 0.05);
        assert_eq!(sim.series_length, 50);
    }

    #[test]
    fn returns_error_for_out_of_range_probability() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        for value in ["1.5", "-0.1", "NaN", "often"] {
            let _guard = EnvVarGuard::set(CLOSE_PROBABILITY_KEY, value);
            let err = Config::from_env().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidProbability(CLOSE_PROBABILITY_KEY)),
                "{value}"
            );
        }
    }

    #[test]
    fn parses_rng_seed() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(RNG_SEED_KEY, "42");

        assert_eq!(Config::from_env().unwrap().rng_seed, Some(42));

        let _bad = EnvVarGuard::set(RNG_SEED_KEY, "-1");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRngSeed));
    }

    #[cfg(unix)]
    #[test]
    fn returns_error_for_non_unicode_env_var() {
        use std::os::unix::ffi::OsStringExt;

        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let value = std::ffi::OsString::from_vec(vec![0x66, 0x6f, 0x80]);
        let _guard = EnvVarGuard::set_os(PIN_KEY, value);

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::NonUnicode(PIN_KEY)));
    }
}
