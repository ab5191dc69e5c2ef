// ============================================================================
// Structure : Game
// ============================================================================
// Un match à venir avec ses cotes, tel que renvoyé par le backend
//
// CONCEPTS RUST :
// 1. Serde : désérialisation directe depuis le JSON du backend
// 2. Option<i32> : cote absente (null) côté serveur
// 3. #[serde(default)] : champs facultatifs dans la réponse
// ============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Clé du marché "head to head" (vainqueur du match)
pub const H2H_MARKET: &str = "h2h";

/// Une issue d'un marché (équipe, over/under, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOutcome {
    /// Nom de l'issue (équipe, "Over", "Under")
    pub name: String,

    /// Cote américaine
    #[serde(default)]
    pub price: Option<i32>,

    /// Handicap ou total de points (marchés spreads / totals)
    #[serde(default)]
    pub point: Option<f64>,
}

/// Un match avec les cotes d'un bookmaker
///
/// CONCEPT : Données transitoires
/// - Remplacées entièrement à chaque fetch
/// - Jamais persistées
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
    pub bookmaker: String,

    /// Cote de l'équipe à domicile (None si le bookmaker n'en propose pas)
    #[serde(default)]
    pub home_odds: Option<i32>,

    #[serde(default)]
    pub away_odds: Option<i32>,

    #[serde(default)]
    pub sport_title: Option<String>,

    /// Tous les marchés renvoyés (h2h, spreads, totals)
    /// CONCEPT RUST : BTreeMap
    /// - Ordre des clés stable, donc affichage stable
    #[serde(default)]
    pub markets: BTreeMap<String, Vec<MarketOutcome>>,
}

/// Côté choisi dans un match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// Bascule domicile <-> extérieur
    pub fn toggle(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl Game {
    /// Équipe correspondant au côté choisi
    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    /// Cote correspondant au côté choisi
    pub fn odds(&self, side: Side) -> Option<i32> {
        match side {
            Side::Home => self.home_odds,
            Side::Away => self.away_odds,
        }
    }

    /// Titre de la carte : "Home vs Away"
    pub fn matchup(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Résumé d'un marché secondaire pour l'affichage
    ///
    /// Format : "Lakers -3.5 (-110) / Celtics +3.5 (-110)"
    /// - spreads : le handicap est signé
    /// - totals : le total est affiché tel quel
    ///
    /// Retourne None si le marché est absent ou vide
    pub fn describe_market(&self, market: &str) -> Option<String> {
        let outcomes = self.markets.get(market)?;
        if outcomes.is_empty() {
            return None;
        }

        let parts: Vec<String> = outcomes
            .iter()
            .map(|outcome| {
                let point = match outcome.point {
                    Some(p) if market == "spreads" => format!(" {:+}", p),
                    Some(p) => format!(" {}", p),
                    None => String::new(),
                };
                format!("{}{} ({})", outcome.name, point, format_odds(outcome.price))
            })
            .collect();

        Some(parts.join(" / "))
    }
}

// ============================================================================
// Formatage
// ============================================================================

/// Formate une cote américaine pour l'affichage
///
/// - None → "N/A"
/// - positif → préfixé par '+' ("+150")
/// - zéro ou négatif → tel quel ("0", "-110")
pub fn format_odds(odds: Option<i32>) -> String {
    match odds {
        None => "N/A".to_string(),
        Some(value) if value > 0 => format!("+{}", value),
        Some(value) => value.to_string(),
    }
}

/// Formate l'heure d'un match dans le fuseau d'affichage
///
/// Format : "Sun, Jan 14, 7:30 PM EST"
/// CONCEPT : chrono-tz
/// - %Z donne l'abréviation du fuseau (EST / EDT selon la date)
/// - %-d et %-I suppriment le zéro initial
pub fn format_game_time(time: &DateTime<Utc>, tz: Tz) -> String {
    time.with_timezone(&tz)
        .format("%a, %b %-d, %-I:%M %p %Z")
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_game() -> Game {
        serde_json::from_value(serde_json::json!({
            "id": "abc123",
            "home_team": "Boston Celtics",
            "away_team": "Los Angeles Lakers",
            "commence_time": "2024-01-15T00:30:00Z",
            "bookmaker": "DraftKings",
            "home_odds": -150,
            "away_odds": null,
            "markets": {
                "spreads": [
                    {"name": "Boston Celtics", "price": -110, "point": -3.5},
                    {"name": "Los Angeles Lakers", "price": -110, "point": 3.5}
                ],
                "totals": [
                    {"name": "Over", "price": -105, "point": 225.5},
                    {"name": "Under", "price": -115, "point": 225.5}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_format_odds() {
        assert_eq!(format_odds(None), "N/A");
        assert_eq!(format_odds(Some(150)), "+150");
        assert_eq!(format_odds(Some(-110)), "-110");
        assert_eq!(format_odds(Some(0)), "0");
    }

    #[test]
    fn test_format_game_time_eastern() {
        let time = Utc.with_ymd_and_hms(2024, 1, 15, 0, 30, 0).unwrap();
        assert_eq!(
            format_game_time(&time, chrono_tz::America::New_York),
            "Sun, Jan 14, 7:30 PM EST"
        );
    }

    #[test]
    fn test_format_game_time_summer_and_utc() {
        let time = Utc.with_ymd_and_hms(2024, 7, 4, 16, 5, 0).unwrap();
        assert_eq!(
            format_game_time(&time, chrono_tz::America::Los_Angeles),
            "Thu, Jul 4, 9:05 AM PDT"
        );
        assert_eq!(format_game_time(&time, chrono_tz::UTC), "Thu, Jul 4, 4:05 PM UTC");
    }

    #[test]
    fn test_game_deserialize_minimal() {
        // Champs facultatifs absents : markets vide, cotes None
        let game: Game = serde_json::from_value(serde_json::json!({
            "id": "g1",
            "home_team": "A",
            "away_team": "B",
            "commence_time": "2024-01-15T00:30:00Z",
            "bookmaker": "FanDuel"
        }))
        .unwrap();

        assert_eq!(game.home_odds, None);
        assert!(game.markets.is_empty());
        assert_eq!(game.describe_market("spreads"), None);
    }

    #[test]
    fn test_game_sides() {
        let game = sample_game();
        assert_eq!(game.team(Side::Home), "Boston Celtics");
        assert_eq!(game.odds(Side::Home), Some(-150));
        assert_eq!(game.odds(Side::Away), None);
        assert_eq!(Side::Home.toggle(), Side::Away);
        assert_eq!(game.matchup(), "Boston Celtics vs Los Angeles Lakers");
    }

    #[test]
    fn test_describe_markets() {
        let game = sample_game();
        assert_eq!(
            game.describe_market("spreads").unwrap(),
            "Boston Celtics -3.5 (-110) / Los Angeles Lakers +3.5 (-110)"
        );
        assert_eq!(
            game.describe_market("totals").unwrap(),
            "Over 225.5 (-105) / Under 225.5 (-115)"
        );
    }
}
