// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Commandes en retour : les méthodes qui déclenchent une requête
//    retournent Option<AppCommand>, l'event loop l'envoie au worker
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Le worker ne touche jamais App : il communique par channels
// ============================================================================

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::time::Instant;

use chrono_tz::Tz;
use tracing::{debug, error, info, warn};

use crate::api::{OddsError, PickError};
use crate::config::Config;
use crate::models::PickSubmission;
use crate::notify::{NotificationKind, NotificationQueue};
use crate::pick_page::PickPage;
use crate::worker::{AppCommand, AppResult, SubmissionId};

// ============================================================================
// Enum : Route
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Représente les pages de l'application
// - Un seul écran actif à la fois
// - Tout chemin inconnu redirige vers l'accueil
// ============================================================================

/// Pages de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// "/" : page d'accueil
    Home,

    /// "/make-pick" : page des cotes et des paris
    MakePick,
}

impl Route {
    /// Chemin de la route
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::MakePick => "/make-pick",
        }
    }

    /// Label du lien dans le header
    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::MakePick => "Make Pick",
        }
    }

    /// Correspondance exacte d'un chemin (après normalisation)
    ///
    /// Normalisation : espaces retirés, un '/' final retiré (sauf pour "/")
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.strip_suffix('/').unwrap_or(trimmed)
        } else {
            trimmed
        };

        match normalized {
            "/" => Some(Route::Home),
            "/make-pick" => Some(Route::MakePick),
            _ => None,
        }
    }

    /// Résout un chemin : tout chemin inconnu redirige vers "/"
    pub fn parse(path: &str) -> Route {
        Route::from_path(path).unwrap_or_else(|| {
            info!(path = %path, "Unknown path, redirecting to /");
            Route::Home
        })
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Page actuellement affichée
    pub route: Route,

    /// Page "Make Pick" montée (None quand on est ailleurs)
    /// CONCEPT : Montage / démontage
    /// - Créée en arrivant sur /make-pick
    /// - Droppée en quittant la route : les matchs sont oubliés
    pub pick_page: Option<PickPage>,

    /// Notifications non-bloquantes (résultats des paris)
    pub notifications: NotificationQueue,

    /// Paris envoyés, en attente de réponse
    /// CONCEPT : Résolution exactement une fois
    /// - remove() au premier résultat
    /// - un second résultat pour le même id est ignoré
    pending_picks: BTreeMap<SubmissionId, PickSubmission>,

    /// Prochain identifiant d'envoi
    next_submission: SubmissionId,

    /// Fuseau d'affichage des heures de match
    pub timezone: Tz,

    /// Two-step quit : première pression de 'q' → true
    pub confirm_quit: bool,

    /// Mode saisie du chemin (touche 'g')
    pub input_mode: bool,

    /// Buffer de saisie
    pub input_buffer: String,

    /// Prompt affiché en mode saisie
    pub input_prompt: String,
}

impl App {
    /// Crée l'application sur la page d'accueil
    pub fn new(config: &Config) -> Self {
        Self {
            running: true,
            route: Route::Home,
            pick_page: None,
            notifications: NotificationQueue::new(config.toast_ttl),
            pending_picks: BTreeMap::new(),
            next_submission: 1,
            timezone: config.timezone,
            confirm_quit: false,
            input_mode: false,
            input_buffer: String::new(),
            input_prompt: String::new(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// Retire les notifications expirées
    pub fn tick(&mut self, now: Instant) {
        self.notifications.retain_visible(now);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Change de page
    ///
    /// CONCEPT : State transition
    /// - Même route → rien (pas de remontage)
    /// - Arrivée sur /make-pick → monte la page et retourne le fetch initial
    /// - Départ de /make-pick → démonte la page
    pub fn navigate(&mut self, route: Route) -> Option<AppCommand> {
        if self.route == route {
            debug!(route = %route.path(), "Already on route");
            return None;
        }

        info!(from = %self.route.path(), to = %route.path(), "Navigating");
        self.route = route;

        match route {
            Route::MakePick => {
                let (page, ticket) = PickPage::mount();
                self.pick_page = Some(page);
                Some(AppCommand::FetchOdds { ticket })
            }
            Route::Home => {
                self.pick_page = None;
                None
            }
        }
    }

    /// Navigue vers un chemin saisi (redirige vers "/" si inconnu)
    pub fn navigate_to_path(&mut self, path: &str) -> Option<AppCommand> {
        self.navigate(Route::parse(path))
    }

    pub fn is_on_pick_page(&self) -> bool {
        self.route == Route::MakePick
    }

    // ========================================================================
    // Actions de la page "Make Pick"
    // ========================================================================

    /// Sport suivant (relance le chargement)
    pub fn next_sport(&mut self) -> Option<AppCommand> {
        let ticket = self.pick_page.as_mut()?.next_sport();
        Some(AppCommand::FetchOdds { ticket })
    }

    /// Sport précédent (relance le chargement)
    pub fn previous_sport(&mut self) -> Option<AppCommand> {
        let ticket = self.pick_page.as_mut()?.previous_sport();
        Some(AppCommand::FetchOdds { ticket })
    }

    /// Relance le chargement après une erreur
    pub fn retry(&mut self) -> Option<AppCommand> {
        let ticket = self.pick_page.as_mut()?.retry()?;
        Some(AppCommand::FetchOdds { ticket })
    }

    /// Envoie le pari en surbrillance
    ///
    /// CONCEPT : Effet indépendant
    /// - L'état de la page (Loading / Loaded / Error) ne change pas
    /// - Le pari est suivi dans pending_picks jusqu'à sa réponse
    pub fn submit_selected_pick(&mut self) -> Option<AppCommand> {
        let pick = self.pick_page.as_ref()?.selected_pick()?;

        let submission = self.next_submission;
        self.next_submission += 1;

        info!(
            submission,
            game_id = %pick.game_id,
            team = %pick.selected_team,
            odds = ?pick.odds,
            "User submitted pick"
        );
        self.pending_picks.insert(submission, pick.clone());

        Some(AppCommand::SubmitPick { submission, pick })
    }

    /// Nombre de paris en attente de réponse
    pub fn pending_pick_count(&self) -> usize {
        self.pending_picks.len()
    }

    // ========================================================================
    // Envoi au worker
    // ========================================================================

    /// Envoie au worker la commande produite par une action
    ///
    /// CONCEPT : SendError rend la valeur
    /// - Si le worker ne reçoit plus rien, la commande échoue sur place
    /// - Un pari reçoit quand même sa notification, la page quitte Loading
    pub fn dispatch(
        &mut self,
        command_tx: &mpsc::Sender<AppCommand>,
        command: Option<AppCommand>,
        now: Instant,
    ) {
        let Some(command) = command else {
            return;
        };

        if let Err(mpsc::SendError(command)) = command_tx.send(command) {
            error!(?command, "Worker channel closed, failing command locally");
            self.apply_result(unavailable(command), now);
        }
    }

    /// Le channel des résultats est fermé : aucune réponse n'arrivera plus
    ///
    /// Chaque pari en attente est résolu en erreur, un chargement en cours
    /// passe en Error
    pub fn worker_lost(&mut self, now: Instant) {
        let pending: Vec<SubmissionId> = self.pending_picks.keys().copied().collect();
        for submission in pending {
            self.apply_result(
                AppResult::PickResolved {
                    submission,
                    result: Err(PickError::WorkerUnavailable),
                },
                now,
            );
        }

        let loading = self
            .pick_page
            .as_ref()
            .filter(|page| page.is_loading())
            .and_then(|page| page.latest_ticket());
        if let Some(ticket) = loading {
            self.apply_result(
                AppResult::OddsFetched {
                    ticket,
                    result: Err(OddsError::WorkerUnavailable),
                },
                now,
            );
        }
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Applique un résultat reçu du worker
    ///
    /// - Cotes : transmises à la page montée (qui ignore les tickets obsolètes)
    /// - Pari : une notification, une seule fois par envoi
    pub fn apply_result(&mut self, result: AppResult, now: Instant) {
        match result {
            AppResult::OddsFetched { ticket, result } => match self.pick_page.as_mut() {
                Some(page) => {
                    page.apply_odds(ticket, result);
                }
                None => {
                    debug!(ticket = ticket.id, "Odds result arrived with no pick page mounted");
                }
            },

            AppResult::PickResolved { submission, result } => {
                let Some(pick) = self.pending_picks.remove(&submission) else {
                    warn!(submission, "Ignoring result for unknown or already resolved pick");
                    return;
                };

                match result {
                    Ok(recorded) => {
                        info!(submission, pick_id = %recorded.id, team = %pick.selected_team, "Pick recorded");
                        self.notifications.push(
                            NotificationKind::Success,
                            format!("Pick recorded successfully! Pick ID: {}", recorded.id),
                            now,
                        );
                    }
                    Err(e) => {
                        warn!(submission, error = %e, team = %pick.selected_team, "Pick failed");
                        self.notifications.push(
                            NotificationKind::Error,
                            format!("Error recording pick: {}", e),
                            now,
                        );
                    }
                }
            }
        }
    }

    // ========================================================================
    // Quit Confirmation Management
    // ========================================================================

    /// Première pression de 'q'
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit (toute autre touche)
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Ouvre le prompt "Go to: "
    pub fn start_goto(&mut self) {
        self.input_mode = true;
        self.input_buffer.clear();
        self.input_prompt = "Go to: ".to_string();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = false;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Récupère la valeur saisie et ferme le prompt
    pub fn submit_input(&mut self) -> String {
        let value = std::mem::take(&mut self.input_buffer);
        self.input_mode = false;
        self.input_prompt.clear();
        value
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.input_mode
    }
}

/// Résultat d'une commande qui n'a jamais atteint le worker
fn unavailable(command: AppCommand) -> AppResult {
    match command {
        AppCommand::FetchOdds { ticket } => AppResult::OddsFetched {
            ticket,
            result: Err(OddsError::WorkerUnavailable),
        },
        AppCommand::SubmitPick { submission, .. } => AppResult::PickResolved {
            submission,
            result: Err(PickError::WorkerUnavailable),
        },
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
