// ============================================================================
// Top Ledger - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client HTTP du backend
pub mod app;       // État de l'application et routes
pub mod config;    // Configuration (.env, variables d'environnement)
pub mod models;    // Structures de données
pub mod notify;    // Notifications non-bloquantes
pub mod pick_page; // Machine à états de la page "Make Pick"
pub mod ui;        // Interface utilisateur
pub mod worker;    // Worker async (requêtes HTTP)

#[cfg(test)]
mod test_support;
