// ============================================================================
// Configuration
// ============================================================================
// Lit la configuration depuis l'environnement (et un éventuel fichier .env)
//
// Variables reconnues :
// - TOP_LEDGER_API_URL    : origine du backend (défaut http://localhost:5000)
// - TOP_LEDGER_TZ         : fuseau IANA pour l'heure des matchs (sinon TZ, sinon UTC)
// - TOP_LEDGER_TOAST_SECS : durée d'affichage des notifications (défaut 6)
// ============================================================================

use std::time::Duration;

use chrono_tz::Tz;
use tracing::warn;

use crate::api::DEFAULT_BASE_URL;

/// Durée d'affichage par défaut d'une notification
pub const DEFAULT_TOAST_SECS: u64 = 6;

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Origine du backend, sans '/' final
    pub api_url: String,

    /// Fuseau d'affichage des heures de match
    pub timezone: Tz,

    /// Durée de vie d'une notification
    pub toast_ttl: Duration,
}

impl Config {
    /// Charge la configuration depuis l'environnement
    ///
    /// CONCEPT : .env optionnel
    /// - dotenv() échoue si le fichier n'existe pas, on ignore l'erreur
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lookup
    ///
    /// CONCEPT RUST : Generic avec trait bound Fn
    /// - Permet de tester sans modifier les vraies variables d'environnement
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("TOP_LEDGER_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timezone = lookup("TOP_LEDGER_TZ")
            .or_else(|| lookup("TZ"))
            .map(|name| parse_timezone(&name))
            .unwrap_or(chrono_tz::UTC);

        let toast_ttl = lookup("TOP_LEDGER_TOAST_SECS")
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    warn!(value = %raw, "Invalid TOP_LEDGER_TOAST_SECS, using default");
                    None
                }
            })
            .unwrap_or(DEFAULT_TOAST_SECS);

        Self {
            api_url,
            timezone,
            toast_ttl: Duration::from_secs(toast_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Parse un nom de fuseau IANA, UTC si inconnu
///
/// TZ peut commencer par ':' (ex: ":America/New_York")
fn parse_timezone(name: &str) -> Tz {
    let trimmed = name.trim().trim_start_matches(':');
    match trimmed.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(timezone = %name, "Unknown time zone, falling back to UTC");
            chrono_tz::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.timezone, chrono_tz::UTC);
        assert_eq!(config.toast_ttl, Duration::from_secs(6));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("TOP_LEDGER_API_URL", "http://ledger.local:8080/"),
            ("TOP_LEDGER_TZ", "America/New_York"),
            ("TOP_LEDGER_TOAST_SECS", "3"),
        ]));

        assert_eq!(config.api_url, "http://ledger.local:8080");
        assert_eq!(config.timezone, chrono_tz::America::New_York);
        assert_eq!(config.toast_ttl, Duration::from_secs(3));
    }

    #[test]
    fn test_tz_fallbacks() {
        let from_tz = Config::from_lookup(lookup_from(&[("TZ", ":Europe/Paris")]));
        assert_eq!(from_tz.timezone, chrono_tz::Europe::Paris);

        let unknown = Config::from_lookup(lookup_from(&[("TOP_LEDGER_TZ", "Mars/Olympus")]));
        assert_eq!(unknown.timezone, chrono_tz::UTC);

        let bad_ttl = Config::from_lookup(lookup_from(&[("TOP_LEDGER_TOAST_SECS", "0")]));
        assert_eq!(bad_ttl.toast_ttl, Duration::from_secs(DEFAULT_TOAST_SECS));
    }
}
