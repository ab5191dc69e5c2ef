// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Non-blocking I/O : poll avec timeout pour garder l'UI vivante
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (expiration des notifications, résultats du worker)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    /// Attente maximale avant un Tick
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                // On ne garde que Press pour éviter les doublons
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),

                // Release, resize, souris : simple rafraîchissement
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================
// CONCEPT RUST : Pattern matching avec if let + matches!
// ============================================================================

/// Extrait le KeyCode d'un événement clavier
fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        Event::Tick => None,
    }
}

/// 'q' : quitter (avec confirmation)
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// '1' : lien "Home"
pub fn is_home_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('1')))
}

/// '2' : lien "Make Pick"
pub fn is_make_pick_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('2')))
}

/// 'g' : saisir un chemin ("Go to: ")
pub fn is_goto_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('g') | KeyCode::Char('G')))
}

/// 'r' : relancer le chargement des cotes
pub fn is_retry_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('r') | KeyCode::Char('R')))
}

/// 'x' : fermer la notification la plus récente
pub fn is_dismiss_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('x') | KeyCode::Char('X')))
}

/// Tab : changer de côté (domicile / extérieur)
pub fn is_toggle_side_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Tab | KeyCode::BackTab))
}

/// Flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K')))
}

/// Flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')))
}

/// Flèche droite ou 'l' : sport suivant
pub fn is_next_sport_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Right | KeyCode::Char('l')))
}

/// Flèche gauche ou 'h' : sport précédent
pub fn is_previous_sport_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Left | KeyCode::Char('h')))
}

/// Caractère accepté dans un chemin ("/make-pick")
pub fn is_path_char_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Char(c)) if c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.')
    )
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event) {
        Some(KeyCode::Char(c)) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_navigation_keys() {
        assert!(is_home_event(&key(KeyCode::Char('1'))));
        assert!(is_make_pick_event(&key(KeyCode::Char('2'))));
        assert!(is_next_sport_event(&key(KeyCode::Right)));
        assert!(is_previous_sport_event(&key(KeyCode::Char('h'))));
        assert!(is_down_event(&key(KeyCode::Char('j'))));
        assert!(is_toggle_side_event(&key(KeyCode::Tab)));
    }

    #[test]
    fn test_path_chars() {
        assert!(is_path_char_event(&key(KeyCode::Char('/'))));
        assert!(is_path_char_event(&key(KeyCode::Char('-'))));
        assert!(!is_path_char_event(&key(KeyCode::Char(' '))));
        assert!(!is_path_char_event(&key(KeyCode::Enter)));
        assert_eq!(get_char_from_event(&key(KeyCode::Char('m'))), Some('m'));
        assert_eq!(get_char_from_event(&Event::Tick), None);
    }
}
