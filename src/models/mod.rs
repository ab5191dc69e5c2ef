// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod game;  // Matchs et cotes (fichier game.rs)
pub mod pick;  // Paris envoyés au backend (fichier pick.rs)
pub mod sport; // Sports disponibles (fichier sport.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use top_ledger::models::game::Game;
// On peut faire : use top_ledger::models::Game;
pub use game::{format_game_time, format_odds, Game, MarketOutcome, Side, H2H_MARKET};
pub use pick::{PickId, PickSubmission, RecordedPick};
pub use sport::Sport;
