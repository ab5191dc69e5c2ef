// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod pick_page; // Rendu de la page "Make Pick"
pub mod shell;     // Header, routes, footer, notifications

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use shell::render;
