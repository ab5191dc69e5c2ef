// ============================================================================
// Enum : Sport
// ============================================================================
// Les sports proposés sur la page "Make Pick"
//
// CONCEPTS RUST :
// 1. Enum Copy : petit type sans données, copié implicitement
// 2. &'static str : chaînes littérales intégrées au binaire
// 3. Cycle d'états : next() / previous() comme pour un sélecteur
// ============================================================================

use serde::{Deserialize, Serialize};

/// Sport disponible pour consulter les cotes
///
/// CONCEPT : Ensemble fermé
/// - Exactement deux sports dans cette version
/// - Immuable pendant toute la durée du programme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    /// NBA (basketball)
    Nba,
    /// NFL (football américain)
    Nfl,
}

impl Sport {
    /// Clé utilisée dans l'URL du backend (ex: "basketball_nba")
    pub fn key(&self) -> &'static str {
        match self {
            Sport::Nba => "basketball_nba",
            Sport::Nfl => "americanfootball_nfl",
        }
    }

    /// Label affiché à l'utilisateur
    pub fn name(&self) -> &'static str {
        match self {
            Sport::Nba => "NBA Basketball",
            Sport::Nfl => "NFL Football",
        }
    }

    /// Icône affichée dans le sélecteur
    pub fn icon(&self) -> &'static str {
        match self {
            Sport::Nba => "🏀",
            Sport::Nfl => "🏈",
        }
    }

    /// Retourne tous les sports dans l'ordre d'affichage
    pub fn all() -> Vec<Sport> {
        vec![Sport::Nba, Sport::Nfl]
    }

    /// Sport suivant (boucle à la fin de la liste)
    pub fn next(&self) -> Sport {
        match self {
            Sport::Nba => Sport::Nfl,
            Sport::Nfl => Sport::Nba,
        }
    }

    /// Sport précédent (boucle au début de la liste)
    pub fn previous(&self) -> Sport {
        match self {
            Sport::Nba => Sport::Nfl,
            Sport::Nfl => Sport::Nba,
        }
    }
}

/// La page "Make Pick" démarre sur la NBA
impl Default for Sport {
    fn default() -> Self {
        Sport::Nba
    }
}
