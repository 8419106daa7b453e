use std::env;

#[derive(Debug, Clone)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn from_env() -> Self {
        match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Parse an environment variable, falling back to a default when the
/// variable is unset or unparsable.
pub fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Parse an environment variable as an address, accepting both `0x`-prefixed
/// hex and plain decimal.
pub fn env_addr_or(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| {
            if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                u64::from_str_radix(hex, 16).ok()
            } else {
                s.parse().ok()
            }
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn environment_defaults_to_development() {
        unsafe { env::remove_var("ENVIRONMENT") };
        assert!(matches!(Environment::from_env(), Environment::Development));
    }

    #[test]
    #[serial]
    fn environment_parses_production_aliases() {
        unsafe { env::set_var("ENVIRONMENT", "PROD") };
        assert!(matches!(Environment::from_env(), Environment::Production));
        unsafe { env::remove_var("ENVIRONMENT") };
    }

    #[test]
    #[serial]
    fn env_addr_accepts_hex_and_decimal() {
        unsafe { env::set_var("TEST_ADDR_HEX", "0x8000_0000".replace('_', "")) };
        assert_eq!(env_addr_or("TEST_ADDR_HEX", 0), 0x8000_0000);

        unsafe { env::set_var("TEST_ADDR_DEC", "4096") };
        assert_eq!(env_addr_or("TEST_ADDR_DEC", 0), 4096);

        assert_eq!(env_addr_or("TEST_ADDR_MISSING", 7), 7);

        unsafe {
            env::remove_var("TEST_ADDR_HEX");
            env::remove_var("TEST_ADDR_DEC");
        }
    }
}
