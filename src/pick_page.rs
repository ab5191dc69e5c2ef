// ============================================================================
// Page "Make Pick" : machine à états
// ============================================================================
// Sport sélectionné, liste des matchs, chargement et erreurs
//
// CONCEPTS RUST :
// 1. Enum avec données : Loading / Loaded(games) / Error(message)
// 2. AtomicU64 : compteur global de tickets, sans Mutex
// 3. Séparation état / effets : les méthodes retournent un FetchTicket,
//    c'est l'appelant qui envoie la requête au worker
//
// CONCEPT : "la dernière intention gagne"
// - Chaque requête de cotes porte un ticket {id, sport}
// - Seul le résultat du dernier ticket émis est appliqué
// - Une réponse en retard (ancien sport, ancienne page) est ignorée
// ============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::api::{ApiInfo, OddsError, OddsPage};
use crate::models::{Game, PickSubmission, Side, Sport};

/// Compteur global : les ids restent uniques même après un remontage de la page
static NEXT_TICKET_ID: AtomicU64 = AtomicU64::new(1);

/// Étiquette d'une requête de cotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub sport: Sport,
}

impl FetchTicket {
    /// Émet un nouveau ticket (id strictement croissant)
    fn issue(sport: Sport) -> Self {
        Self {
            id: NEXT_TICKET_ID.fetch_add(1, Ordering::Relaxed),
            sport,
        }
    }
}

/// État du chargement des cotes
#[derive(Debug, Clone, PartialEq)]
pub enum OddsState {
    Loading,
    Loaded(Vec<Game>),
    Error(String),
}

/// Ce que la page doit afficher, par ordre de priorité
///
/// CONCEPT RUST : Lifetime 'a
/// - La vue emprunte les données de la page, aucune copie
#[derive(Debug, PartialEq)]
pub enum PickView<'a> {
    Loading { sport: Sport },
    Error { message: &'a str },
    Games { sport: Sport, games: &'a [Game] },
    Empty { sport: Sport },
}

/// État de la page "Make Pick"
#[derive(Debug)]
pub struct PickPage {
    selected_sport: Sport,
    state: OddsState,

    /// Dernier ticket émis : seul son résultat est accepté
    latest: Option<FetchTicket>,

    /// Match en surbrillance dans la liste
    selected_game: usize,

    /// Côté en surbrillance (domicile / extérieur)
    selected_side: Side,

    /// Quota de l'API amont, si le backend le fournit
    api_info: Option<ApiInfo>,
}

impl PickPage {
    /// Monte la page : passe en Loading sur le sport par défaut
    ///
    /// Retourne la page et le ticket de la première requête
    pub fn mount() -> (Self, FetchTicket) {
        let mut page = Self {
            selected_sport: Sport::default(),
            state: OddsState::Loading,
            latest: None,
            selected_game: 0,
            selected_side: Side::Home,
            api_info: None,
        };
        let ticket = page.begin_fetch();
        info!(sport = %page.selected_sport.key(), "Pick page mounted");
        (page, ticket)
    }

    /// Sélectionne un sport et relance le chargement
    ///
    /// Même si c'est déjà le sport sélectionné : une requête par sélection
    pub fn select_sport(&mut self, sport: Sport) -> FetchTicket {
        info!(sport = %sport.key(), "User selected sport");
        self.selected_sport = sport;
        self.begin_fetch()
    }

    /// Sport suivant dans le sélecteur
    pub fn next_sport(&mut self) -> FetchTicket {
        self.select_sport(self.selected_sport.next())
    }

    /// Sport précédent dans le sélecteur
    pub fn previous_sport(&mut self) -> FetchTicket {
        self.select_sport(self.selected_sport.previous())
    }

    /// Relance la requête du sport courant, uniquement depuis l'état Error
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if !matches!(self.state, OddsState::Error(_)) {
            debug!("Retry ignored outside of error state");
            return None;
        }

        info!(sport = %self.selected_sport.key(), "User retried odds fetch");
        Some(self.begin_fetch())
    }

    /// Passe en Loading et émet un nouveau ticket
    ///
    /// La requête précédente n'est pas annulée : son ticket devient obsolète
    fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = FetchTicket::issue(self.selected_sport);
        self.state = OddsState::Loading;
        self.latest = Some(ticket);
        ticket
    }

    /// Applique le résultat d'une requête de cotes
    ///
    /// Retourne false (et ne touche à rien) si le ticket n'est pas le dernier
    /// émis ou ne correspond plus au sport sélectionné
    pub fn apply_odds(&mut self, ticket: FetchTicket, result: Result<OddsPage, OddsError>) -> bool {
        if self.latest != Some(ticket) || ticket.sport != self.selected_sport {
            warn!(
                ticket = ticket.id,
                sport = %ticket.sport.key(),
                latest = ?self.latest.map(|t| t.id),
                "Discarding stale odds result"
            );
            return false;
        }

        match result {
            Ok(page) => {
                info!(sport = %ticket.sport.key(), games = page.games.len(), "Odds loaded");
                self.state = OddsState::Loaded(page.games);
                self.api_info = page.api_info;
            }
            Err(e) => {
                warn!(sport = %ticket.sport.key(), error = %e, "Odds fetch failed");
                self.state = OddsState::Error(e.to_string());
                self.api_info = None;
            }
        }

        self.selected_game = 0;
        self.selected_side = Side::Home;
        true
    }

    // ========================================================================
    // Lecture de l'état
    // ========================================================================

    pub fn selected_sport(&self) -> Sport {
        self.selected_sport
    }

    pub fn state(&self) -> &OddsState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == OddsState::Loading
    }

    pub fn latest_ticket(&self) -> Option<FetchTicket> {
        self.latest
    }

    pub fn api_info(&self) -> Option<&ApiInfo> {
        self.api_info.as_ref()
    }

    /// Matchs chargés (vide en Loading ou en Error)
    pub fn games(&self) -> &[Game] {
        match &self.state {
            OddsState::Loaded(games) => games.as_slice(),
            _ => &[],
        }
    }

    pub fn selected_game_index(&self) -> usize {
        self.selected_game
    }

    pub fn selected_side(&self) -> Side {
        self.selected_side
    }

    /// Vue à afficher, selon la priorité Loading > Error > Games > Empty
    pub fn view(&self) -> PickView<'_> {
        match &self.state {
            OddsState::Loading => PickView::Loading {
                sport: self.selected_sport,
            },
            OddsState::Error(message) => PickView::Error {
                message: message.as_str(),
            },
            OddsState::Loaded(games) if !games.is_empty() => PickView::Games {
                sport: self.selected_sport,
                games: games.as_slice(),
            },
            OddsState::Loaded(_) => PickView::Empty {
                sport: self.selected_sport,
            },
        }
    }

    // ========================================================================
    // Navigation dans la liste et choix d'un pari
    // ========================================================================

    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        self.selected_game = self.selected_game.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.games().len().saturating_sub(1);
        self.selected_game = (self.selected_game + 1).min(max_index);
    }

    pub fn toggle_side(&mut self) {
        self.selected_side = self.selected_side.toggle();
    }

    /// Construit le pari pour le match et le côté en surbrillance
    ///
    /// None si aucune carte n'est affichée (Loading, Error, liste vide)
    pub fn selected_pick(&self) -> Option<PickSubmission> {
        let game = self.games().get(self.selected_game)?;
        Some(PickSubmission::for_side(game, self.selected_side))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str, home_odds: Option<i32>, away_odds: Option<i32>) -> Game {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "home_team": format!("{} Home", id),
            "away_team": format!("{} Away", id),
            "commence_time": "2024-01-15T00:30:00Z",
            "bookmaker": "DraftKings",
            "home_odds": home_odds,
            "away_odds": away_odds
        }))
        .unwrap()
    }

    fn loaded(games: Vec<Game>) -> Result<OddsPage, OddsError> {
        Ok(OddsPage {
            games,
            api_info: None,
        })
    }

    #[test]
    fn test_mount_issues_fetch_for_default_sport() {
        let (page, ticket) = PickPage::mount();

        assert_eq!(ticket.sport, Sport::Nba);
        assert_eq!(page.latest_ticket(), Some(ticket));
        assert_eq!(page.view(), PickView::Loading { sport: Sport::Nba });
    }

    #[test]
    fn test_loaded_games_count() {
        let (mut page, ticket) = PickPage::mount();
        let games = vec![game("a", Some(150), Some(-170)), game("b", None, None)];

        assert!(page.apply_odds(ticket, loaded(games)));

        match page.view() {
            PickView::Games { sport, games } => {
                assert_eq!(sport, Sport::Nba);
                assert_eq!(games.len(), 2);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_empty_list_view() {
        let (mut page, ticket) = PickPage::mount();
        page.apply_odds(ticket, loaded(vec![]));
        assert_eq!(page.view(), PickView::Empty { sport: Sport::Nba });
        assert_eq!(page.selected_pick(), None);
    }

    #[test]
    fn test_error_clears_games_and_retry() {
        let (mut page, ticket) = PickPage::mount();
        page.apply_odds(ticket, loaded(vec![game("a", None, None)]));

        // Retry ignoré hors de l'état Error
        assert_eq!(page.retry(), None);

        let second = page.select_sport(Sport::Nfl);
        page.apply_odds(second, Err(OddsError::Rejected(Some("X".to_string()))));

        assert_eq!(page.view(), PickView::Error { message: "X" });
        assert!(page.games().is_empty());

        let retry = page.retry().unwrap();
        assert_eq!(retry.sport, Sport::Nfl);
        assert!(page.is_loading());
    }

    #[test]
    fn test_status_error_uses_generic_message() {
        let (mut page, ticket) = PickPage::mount();
        page.apply_odds(ticket, Err(OddsError::Status(503)));
        assert_eq!(page.view(), PickView::Error { message: "Failed to fetch odds" });
    }

    #[test]
    fn test_each_selection_issues_one_ticket() {
        let (mut page, first) = PickPage::mount();

        let second = page.select_sport(Sport::Nfl);
        let third = page.select_sport(Sport::Nfl);

        assert!(second.id > first.id);
        assert!(third.id > second.id);
        assert_eq!(second.sport, Sport::Nfl);
        assert_eq!(third.sport, Sport::Nfl);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let (mut page, nba) = PickPage::mount();
        let nfl = page.select_sport(Sport::Nfl);

        // La réponse NBA arrive après le changement de sport
        assert!(!page.apply_odds(nba, loaded(vec![game("nba", None, None)])));
        assert!(page.is_loading());

        assert!(page.apply_odds(nfl, loaded(vec![game("nfl", None, None)])));
        assert_eq!(page.games()[0].id, "nfl");

        // Un doublon du même ticket après un nouveau fetch est aussi ignoré
        let nba_again = page.select_sport(Sport::Nba);
        assert!(!page.apply_odds(nfl, loaded(vec![])));
        assert_eq!(page.latest_ticket(), Some(nba_again));
    }

    #[test]
    fn test_ticket_from_other_page_is_discarded() {
        let (_old_page, old_ticket) = PickPage::mount();
        let (mut page, _ticket) = PickPage::mount();

        assert!(!page.apply_odds(old_ticket, loaded(vec![])));
        assert!(page.is_loading());
    }

    #[test]
    fn test_selected_pick_follows_navigation() {
        let (mut page, ticket) = PickPage::mount();
        page.apply_odds(
            ticket,
            loaded(vec![game("a", Some(150), Some(-170)), game("b", Some(-110), None)]),
        );

        let pick = page.selected_pick().unwrap();
        assert_eq!(pick.game_id, "a");
        assert_eq!(pick.selected_team, "a Home");
        assert_eq!(pick.odds, Some(150));
        assert_eq!(pick.market_type, "h2h");

        page.navigate_down();
        page.navigate_down();
        page.toggle_side();
        let pick = page.selected_pick().unwrap();
        assert_eq!(pick.game_id, "b");
        assert_eq!(pick.selected_team, "b Away");
        assert_eq!(pick.odds, None);

        page.navigate_up();
        assert_eq!(page.selected_game_index(), 0);
    }

    #[test]
    fn test_no_pick_while_loading() {
        let (mut page, ticket) = PickPage::mount();
        page.apply_odds(ticket, loaded(vec![game("a", None, None)]));
        page.next_sport();
        assert_eq!(page.selected_pick(), None);
    }
}
