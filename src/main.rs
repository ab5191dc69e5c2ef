// ============================================================================
// Top Ledger - Point d'entrée
// ============================================================================
// Programme TUI : page d'accueil + page "Make Pick"
// Charge les cotes depuis le backend et enregistre les paris
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements, résultats et rendering
// 3. Async dans sync : le worker possède un runtime tokio
// 4. Channels : l'UI ne bloque jamais sur le réseau
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use top_ledger::api::LedgerClient;
use top_ledger::app::{App, Route};
use top_ledger::config::Config;
use top_ledger::ui::{events::EventHandler, render, Event};
use top_ledger::worker::{spawn_background_worker, AppCommand, AppResult};

// ============================================================================
// Logging
// ============================================================================
// CONCEPT : Logs dans un fichier
// - Le TUI occupe tout le terminal : impossible d'écrire sur stdout
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Répertoire des logs
///
/// - Linux : ~/.local/share/top-ledger/logs
/// - macOS : ~/Library/Application Support/top-ledger/logs
/// - Sinon : ./logs
fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("top-ledger").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/top-ledger/logs/top-ledger.log.*
/// RUST_LOG=top_ledger=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "top-ledger.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Utile : UI thread vs worker
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour top_ledger, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "top_ledger=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Logging avant tout le reste (non fatal)
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    let config = Config::from_env();
    info!(api_url = %config.api_url, timezone = %config.timezone, "Top Ledger starting up");
    println!("Top Ledger starting up ({})", config.api_url);

    let client = LedgerClient::new(config.api_url.as_str())?;

    // Health check : affiché et loggé, jamais fatal
    check_backend(&client)?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new(&config);

    // command : UI → worker, result : worker → UI
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    let worker = match spawn_background_worker(client, command_rx, result_tx) {
        Ok(worker) => worker,
        Err(e) => {
            restore_terminal(&mut terminal)?;
            return Err(e);
        }
    };

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Ferme le channel : le worker sort de sa boucle
    drop(command_tx);
    if worker.join().is_err() {
        warn!("Worker thread panicked");
    }

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Délai maximal du health check de démarrage
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Interroge GET / une fois au démarrage
///
/// Le runtime est temporaire : le worker crée le sien
fn check_backend(client: &LedgerClient) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    match runtime.block_on(client.health(HEALTH_CHECK_TIMEOUT)) {
        Ok(health) => {
            info!(status = %health.status, message = ?health.message, "Backend health check succeeded");
            println!("✅ Backend: {}", health.status);
        }
        Err(e) => {
            warn!(error = %e, "Backend health check failed");
            println!("⚠️  Backend unreachable at {}: {}", client.base_url(), e);
        }
    }

    Ok(())
}

// ============================================================================
// Event loop
// ============================================================================

/// Boucle principale : résultats → rendu → événement → tick
///
/// CONCEPT : L'UI thread possède App
/// - Pas de Mutex : le worker ne communique que par channels
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    let mut worker_alive = true;

    while app.is_running() {
        // 0. RÉSULTATS : vide le channel sans bloquer
        while worker_alive {
            match result_rx.try_recv() {
                Ok(result) => app.apply_result(result, Instant::now()),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    // Les paris en vol ne recevront jamais de réponse
                    error!(pending = app.pending_pick_count(), "Worker thread disconnected!");
                    app.worker_lost(Instant::now());
                    worker_alive = false;
                }
            }
        }

        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        match events.next() {
            Ok(event) => {
                let command = handle_event(app, event);
                app.dispatch(command_tx, command, Instant::now());
            }
            Err(e) => warn!(error = %e, "Failed to read terminal event"),
        }

        // 3. UPDATE : expiration des notifications
        app.tick(Instant::now());
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// Retourne la commande à envoyer au worker, si l'action en produit une
///
/// CONCEPT RUST : if / else if comme expression
/// - Le mode input capture toutes les touches
/// - Les touches de page ne valent que sur leur route
fn handle_event(app: &mut App, event: Event) -> Option<AppCommand> {
    use top_ledger::ui::events::{
        get_char_from_event, is_backspace_event, is_dismiss_event, is_down_event,
        is_enter_event, is_escape_event, is_goto_event, is_home_event, is_make_pick_event,
        is_next_sport_event, is_path_char_event, is_previous_sport_event, is_quit_event,
        is_retry_event, is_toggle_side_event, is_up_event,
    };

    if matches!(event, Event::Tick) {
        return None;
    }

    // ========================================
    // Input Mode : saisie du chemin
    // ========================================
    if app.is_in_input_mode() {
        if is_escape_event(&event) {
            info!("User cancelled path input");
            app.cancel_input();
        } else if is_enter_event(&event) {
            let path = app.submit_input();
            info!(path = %path, "User submitted path");
            return app.navigate_to_path(&path);
        } else if is_backspace_event(&event) {
            app.backspace();
        } else if is_path_char_event(&event) {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }
        return None;
    }

    // Two-step quit : 'q' puis 'q'
    if is_quit_event(&event) {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        return None;
    }

    // Toute autre touche annule la confirmation
    app.cancel_quit();

    if is_home_event(&event) {
        return app.navigate(Route::Home);
    }
    if is_make_pick_event(&event) {
        return app.navigate(Route::MakePick);
    }
    if is_goto_event(&event) {
        app.start_goto();
        return None;
    }
    if is_dismiss_event(&event) {
        app.notifications.dismiss_latest();
        return None;
    }

    if !app.is_on_pick_page() {
        // Accueil : Enter ouvre "Make Pick"
        return if is_enter_event(&event) {
            app.navigate(Route::MakePick)
        } else {
            None
        };
    }

    if is_next_sport_event(&event) {
        app.next_sport()
    } else if is_previous_sport_event(&event) {
        app.previous_sport()
    } else if is_retry_event(&event) {
        app.retry()
    } else if is_enter_event(&event) {
        app.submit_selected_pick()
    } else {
        if let Some(page) = app.pick_page.as_mut() {
            if is_up_event(&event) {
                page.navigate_up();
            } else if is_down_event(&event) {
                page.navigate_down();
            } else if is_toggle_side_event(&event) {
                page.toggle_side();
            }
        }
        None
    }
}


// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
