// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client HTTP du backend Top Ledger
// (cotes des matchs et enregistrement des paris)
// ============================================================================

pub mod ledger; // Client API du backend

// Re-export des types principaux
pub use ledger::{
    ApiInfo, HealthStatus, LedgerClient, OddsError, OddsPage, PickError, DEFAULT_BASE_URL,
    ODDS_FAILURE, PICK_FAILURE, WORKER_UNAVAILABLE,
};
