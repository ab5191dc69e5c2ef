// ============================================================================
// Structures : PickSubmission / RecordedPick
// ============================================================================
// Un pari choisi par l'utilisateur, envoyé au backend
//
// CONCEPTS RUST :
// 1. Serialize : le corps JSON du POST est exactement cette structure
// 2. #[serde(untagged)] : identifiant texte OU nombre
// 3. Display : affichage direct de l'identifiant
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::game::{Game, Side, H2H_MARKET};

/// Corps de la requête POST /api/make-pick
///
/// CONCEPT : Construit au moment du choix
/// - Jamais conservé côté client après l'envoi
/// - L'ordre et les noms des champs sont ceux attendus par le backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickSubmission {
    pub game_id: String,
    pub selected_team: String,
    /// Cote au moment du choix (null si le bookmaker n'en propose pas)
    pub odds: Option<i32>,
    pub market_type: String,
}

impl PickSubmission {
    /// Crée un pari "h2h" (marché par défaut)
    pub fn new(game_id: String, selected_team: String, odds: Option<i32>) -> Self {
        Self::with_market(game_id, selected_team, odds, H2H_MARKET.to_string())
    }

    /// Crée un pari sur un marché explicite
    pub fn with_market(
        game_id: String,
        selected_team: String,
        odds: Option<i32>,
        market_type: String,
    ) -> Self {
        Self {
            game_id,
            selected_team,
            odds,
            market_type,
        }
    }

    /// Construit le pari pour un côté d'un match
    pub fn for_side(game: &Game, side: Side) -> Self {
        Self::new(game.id.clone(), game.team(side).to_string(), game.odds(side))
    }
}

/// Identifiant renvoyé par le backend
///
/// Le backend de référence renvoie "pick_<timestamp>", mais un
/// identifiant numérique est aussi accepté
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PickId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickId::Number(n) => write!(f, "{}", n),
            PickId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Pari enregistré par le backend
///
/// Seul l'identifiant est montré à l'utilisateur, le reste est optionnel
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordedPick {
    pub id: PickId,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_submission_body() {
        let pick = PickSubmission::new("G".to_string(), "T".to_string(), Some(-110));
        let body = serde_json::to_value(&pick).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "game_id": "G",
                "selected_team": "T",
                "odds": -110,
                "market_type": "h2h"
            })
        );
    }

    #[test]
    fn test_pick_submission_null_odds() {
        let pick = PickSubmission::new("G".to_string(), "T".to_string(), None);
        let body = serde_json::to_value(&pick).unwrap();
        assert_eq!(body["odds"], serde_json::Value::Null);
    }

    #[test]
    fn test_pick_id_forms() {
        let numeric: RecordedPick = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(numeric.id.to_string(), "42");

        let text: RecordedPick =
            serde_json::from_str(r#"{"id": "pick_1705280000.5", "status": "pending"}"#).unwrap();
        assert_eq!(text.id.to_string(), "pick_1705280000.5");
        assert_eq!(text.status.as_deref(), Some("pending"));
    }
}
