// ============================================================================
// Background Worker
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui possède un runtime tokio
// - Reçoit des AppCommand via un channel (command_rx)
// - Lance une tâche async par commande : les requêtes tournent en parallèle
// - Envoie des AppResult via un autre channel (result_tx)
// - Permet de faire des appels API sans bloquer l'UI
// ============================================================================

use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::{LedgerClient, OddsError, OddsPage, PickError};
use crate::models::{PickSubmission, RecordedPick};
use crate::pick_page::FetchTicket;

/// Identifiant d'un envoi de pari (un par action utilisateur)
pub type SubmissionId = u64;

/// Commandes envoyées au worker pour exécuter des tâches async
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Charger les cotes d'un sport
    /// - ticket : étiquette de la requête, renvoyée telle quelle avec le résultat
    FetchOdds { ticket: FetchTicket },

    /// Enregistrer un pari
    /// CONCEPT : Fire-and-forget
    /// - Aucun dédoublonnage, aucune annulation, aucun retry
    SubmitPick {
        submission: SubmissionId,
        pick: PickSubmission,
    },
}

/// Résultats renvoyés par le worker
#[derive(Debug)]
pub enum AppResult {
    /// Réponse (ou erreur) d'un chargement de cotes
    OddsFetched {
        ticket: FetchTicket,
        result: Result<OddsPage, OddsError>,
    },

    /// Réponse (ou erreur) d'un envoi de pari
    PickResolved {
        submission: SubmissionId,
        result: Result<RecordedPick, PickError>,
    },
}

/// Lance le worker thread
///
/// CONCEPT RUST : Thread + async runtime
/// - Le runtime est créé ici pour propager l'erreur avec ?
/// - Puis déplacé (move) dans le thread qui le possède
/// - Le thread s'arrête quand command_tx est droppé (channel fermé)
///
/// # Arguments
/// * `client` - Client HTTP, cloné pour chaque tâche
/// * `command_rx` - Receiver pour recevoir les commandes
/// * `result_tx` - Sender pour envoyer les résultats
pub fn spawn_background_worker(
    client: LedgerClient,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) -> Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    std::thread::Builder::new()
        .name("ledger-worker".to_string())
        .spawn(move || {
            // Boucle de traitement des commandes
            // - recv() bloque ce thread (pas l'UI)
            // - chaque commande devient une tâche indépendante
            while let Ok(command) = command_rx.recv() {
                info!(?command, "Worker received command");
                runtime.spawn(execute(client.clone(), command, result_tx.clone()));
            }

            // Channel fermé, on quitte (les tâches en cours sont abandonnées)
            info!("Worker thread exiting (channel closed)");
        })
        .context("Échec du lancement du worker thread")
}

/// Exécute une commande et renvoie son résultat
async fn execute(client: LedgerClient, command: AppCommand, result_tx: mpsc::Sender<AppResult>) {
    let result = match command {
        AppCommand::FetchOdds { ticket } => AppResult::OddsFetched {
            ticket,
            result: client.fetch_odds(ticket.sport).await,
        },
        AppCommand::SubmitPick { submission, pick } => AppResult::PickResolved {
            submission,
            result: client.make_pick(&pick).await,
        },
    };

    if result_tx.send(result).is_err() {
        debug!("Result channel closed, dropping worker result");
    }
}

// ============================================================================
// Tests
// ============================================================================
