// ============================================================================
// API Client : backend Top Ledger
// ============================================================================
// Récupère les cotes et enregistre les paris via le backend HTTP
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. thiserror : erreurs typées dont le message est affiché tel quel
// 3. Serde : désérialisation JSON automatique des enveloppes de réponse
// 4. Clone bon marché : reqwest::Client partage son pool de connexions
// ============================================================================

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::models::{Game, PickSubmission, RecordedPick, Sport};

/// Origine du backend par défaut
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Message générique quand les cotes ne peuvent pas être chargées
pub const ODDS_FAILURE: &str = "Failed to fetch odds";

/// Message quand le backend refuse un pari sans donner de raison
pub const PICK_FAILURE: &str = "Failed to record pick";

/// Message quand le worker réseau ne tourne plus
pub const WORKER_UNAVAILABLE: &str = "background worker is not running";

// ============================================================================
// Erreurs
// ============================================================================
// CONCEPT RUST : thiserror
// - #[error(...)] génère l'implémentation de Display
// - Le Display est exactement le texte montré à l'utilisateur
// - #[from] permet d'utiliser ? sur une reqwest::Error
// ============================================================================

/// Échec du chargement des cotes
///
/// Ordre de priorité du message :
/// 1. texte d'erreur fourni par le serveur
/// 2. message générique "Failed to fetch odds"
/// 3. texte de l'erreur réseau
#[derive(Debug, Error)]
pub enum OddsError {
    /// Statut HTTP hors 2xx : message générique, quel que soit le corps
    #[error("Failed to fetch odds")]
    Status(u16),

    /// Réponse avec success = false
    #[error("{}", rejection_message(.0, ODDS_FAILURE))]
    Rejected(Option<String>),

    /// Erreur réseau ou corps illisible
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// La requête n'a jamais pu partir : le worker est arrêté
    #[error("{}", WORKER_UNAVAILABLE)]
    WorkerUnavailable,
}

/// Échec de l'enregistrement d'un pari
#[derive(Debug, Error)]
pub enum PickError {
    /// Réponse avec success = false
    #[error("{}", rejection_message(.0, PICK_FAILURE))]
    Rejected(Option<String>),

    /// success = true mais pas d'objet "pick" dans la réponse
    #[error("response did not include a pick")]
    MissingPick,

    /// Erreur réseau ou corps illisible
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Le pari n'a jamais pu partir, ou sa réponse ne reviendra pas
    #[error("{}", WORKER_UNAVAILABLE)]
    WorkerUnavailable,
}

/// Texte d'erreur du serveur, ou le message par défaut s'il est absent/vide
fn rejection_message<'a>(error: &'a Option<String>, fallback: &'a str) -> &'a str {
    match error.as_deref() {
        Some(message) if !message.is_empty() => message,
        _ => fallback,
    }
}

// ============================================================================
// Enveloppes JSON du backend
// ============================================================================

/// Réponse de GET /api/odds/{sport}
#[derive(Debug, Deserialize)]
struct OddsResponse {
    success: bool,
    /// Entrées brutes : un match mal formé ne doit pas invalider les autres
    #[serde(default)]
    games: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    api_info: Option<ApiInfo>,
}

/// Décode chaque match séparément, les entrées invalides sont ignorées
fn parse_games(raw: Vec<serde_json::Value>) -> Vec<Game> {
    raw.into_iter()
        .filter_map(|entry| match serde_json::from_value::<Game>(entry) {
            Ok(game) => Some(game),
            Err(e) => {
                warn!(error = %e, "Skipping malformed game entry");
                None
            }
        })
        .collect()
}

/// Réponse de POST /api/make-pick
#[derive(Debug, Deserialize)]
struct PickResponse {
    success: bool,
    #[serde(default)]
    pick: Option<RecordedPick>,
    #[serde(default)]
    error: Option<String>,
}

/// Quota de l'API de cotes en amont, relayé par le backend
///
/// Le backend relaie des en-têtes HTTP : texte ou nombre selon la version
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    remaining_requests: Option<serde_json::Value>,
    #[serde(default)]
    used_requests: Option<serde_json::Value>,
}

impl ApiInfo {
    /// Requêtes restantes, ou "Unknown"
    pub fn remaining(&self) -> String {
        display_value(self.remaining_requests.as_ref())
    }

    /// Requêtes consommées, ou "Unknown"
    pub fn used(&self) -> String {
        display_value(self.used_requests.as_ref())
    }
}

fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => "Unknown".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Résultat d'un chargement de cotes réussi
#[derive(Debug, Clone, PartialEq)]
pub struct OddsPage {
    pub games: Vec<Game>,
    pub api_info: Option<ApiInfo>,
}

/// Réponse du health check (GET /)
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// Client HTTP du backend Top Ledger
///
/// CONCEPT RUST : Clone
/// - reqwest::Client est un Arc interne
/// - Cloner le client pour chaque tâche ne recrée pas de connexions
#[derive(Debug, Clone)]
pub struct LedgerClient {
    base_url: String,
    client: reqwest::Client,
}

impl LedgerClient {
    /// Crée un client pour l'origine donnée (ex: "http://localhost:5000")
    ///
    /// Aucun timeout n'est configuré : on garde les valeurs par défaut
    /// de la pile réseau
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .user_agent(concat!("top-ledger/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self { base_url, client })
    }

    /// Origine du backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Récupère les matchs et cotes pour un sport
    ///
    /// CONCEPT : Trois classes d'erreurs
    /// - statut HTTP hors 2xx → OddsError::Status (message générique)
    /// - success = false → OddsError::Rejected (message du serveur)
    /// - réseau / JSON invalide → OddsError::Transport (texte de l'erreur)
    ///
    /// success = true sans "games" donne une liste vide
    #[instrument(skip(self), fields(sport = %sport.key()))]
    pub async fn fetch_odds(&self, sport: Sport) -> Result<OddsPage, OddsError> {
        let url = format!("{}/api/odds/{}", self.base_url, sport.key());
        debug!(url = %url, "Requesting odds");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "Backend returned error status for odds");
            return Err(OddsError::Status(status.as_u16()));
        }

        let body: OddsResponse = response.json().await?;

        if !body.success {
            warn!(error = ?body.error, "Backend rejected odds request");
            return Err(OddsError::Rejected(body.error));
        }

        let games = parse_games(body.games.unwrap_or_default());
        info!(games = games.len(), "Odds fetched successfully");

        Ok(OddsPage {
            games,
            api_info: body.api_info,
        })
    }

    /// Enregistre un pari
    ///
    /// Le statut HTTP n'est pas vérifié : seul le champ success du corps compte
    #[instrument(skip(self, pick), fields(game_id = %pick.game_id, team = %pick.selected_team))]
    pub async fn make_pick(&self, pick: &PickSubmission) -> Result<RecordedPick, PickError> {
        let url = format!("{}/api/make-pick", self.base_url);
        debug!(url = %url, odds = ?pick.odds, market = %pick.market_type, "Submitting pick");

        let response = self.client.post(&url).json(pick).send().await?;
        debug!(status = %response.status(), "Received HTTP response");

        let body: PickResponse = response.json().await?;

        if !body.success {
            warn!(error = ?body.error, "Backend rejected pick");
            return Err(PickError::Rejected(body.error));
        }

        let recorded = body.pick.ok_or(PickError::MissingPick)?;
        info!(pick_id = %recorded.id, "Pick recorded");
        Ok(recorded)
    }

    /// Vérifie que le backend répond (GET /)
    ///
    /// Contrairement aux appels métier, le health check est borné par `limit` :
    /// il tourne avant l'ouverture du TUI
    #[instrument(skip(self))]
    pub async fn health(&self, limit: Duration) -> anyhow::Result<HealthStatus> {
        tokio::time::timeout(limit, self.request_health())
            .await
            .map_err(|_| anyhow::anyhow!("Pas de réponse du backend après {:?}", limit))?
    }

    async fn request_health(&self) -> anyhow::Result<HealthStatus> {
        let url = format!("{}/", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Backend injoignable")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Le backend a retourné une erreur : HTTP {}", status);
        }

        let health: HealthStatus = response
            .json()
            .await
            .context("Échec du parsing JSON du health check")?;

        info!(status = %health.status, "Backend health check passed");
        Ok(health)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
// CONCEPT : Faux backend axum
// - Un vrai serveur HTTP sur 127.0.0.1:0 (port libre choisi par l'OS)
// - Le client est testé de bout en bout, sans réseau externe
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::{closed_port_url, spawn_backend};

    fn game_json(id: &str) -> Value {
        json!({
            "id": id,
            "home_team": "Boston Celtics",
            "away_team": "Los Angeles Lakers",
            "commence_time": "2024-01-15T00:30:00Z",
            "bookmaker": "DraftKings",
            "home_odds": -150,
            "away_odds": 130
        })
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(OddsError::Status(500).to_string(), "Failed to fetch odds");
        assert_eq!(OddsError::Rejected(Some("X".into())).to_string(), "X");
        assert_eq!(OddsError::Rejected(None).to_string(), "Failed to fetch odds");
        assert_eq!(OddsError::Rejected(Some(String::new())).to_string(), "Failed to fetch odds");
        assert_eq!(PickError::Rejected(None).to_string(), "Failed to record pick");
        assert_eq!(PickError::Rejected(Some("nope".into())).to_string(), "nope");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = LedgerClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_fetch_odds_success() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_handler = seen.clone();

        let router = Router::new().route(
            "/api/odds/:sport",
            get(move |Path(sport): Path<String>| {
                let seen = seen_in_handler.clone();
                async move {
                    seen.lock().unwrap().push(sport);
                    Json(json!({
                        "success": true,
                        "games": [game_json("g1"), game_json("g2"), game_json("g3")],
                        "api_info": {"remaining_requests": "480", "used_requests": 20}
                    }))
                }
            }),
        );
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let page = client.fetch_odds(Sport::Nfl).await.unwrap();

        assert_eq!(page.games.len(), 3);
        assert_eq!(page.games[0].away_odds, Some(130));
        let info = page.api_info.unwrap();
        assert_eq!(info.remaining(), "480");
        assert_eq!(info.used(), "20");
        assert_eq!(*seen.lock().unwrap(), vec!["americanfootball_nfl".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_odds_success_without_games() {
        let router = Router::new().route(
            "/api/odds/:sport",
            get(|| async { Json(json!({"success": true})) }),
        );
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let page = client.fetch_odds(Sport::Nba).await.unwrap();
        assert!(page.games.is_empty());
        assert_eq!(page.api_info, None);
    }

    #[tokio::test]
    async fn test_fetch_odds_rejected_uses_server_message() {
        let router = Router::new().route(
            "/api/odds/:sport",
            get(|| async { Json(json!({"success": false, "error": "X"})) }),
        );
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let err = client.fetch_odds(Sport::Nba).await.unwrap_err();
        assert!(matches!(err, OddsError::Rejected(_)));
        assert_eq!(err.to_string(), "X");
    }

    #[tokio::test]
    async fn test_fetch_odds_bad_status_ignores_body() {
        let router = Router::new().route(
            "/api/odds/:sport",
            get(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"success": false, "error": "Invalid sport"})),
                )
            }),
        );
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let err = client.fetch_odds(Sport::Nba).await.unwrap_err();
        assert!(matches!(err, OddsError::Status(400)));
        assert_eq!(err.to_string(), ODDS_FAILURE);
    }

    #[tokio::test]
    async fn test_fetch_odds_invalid_json() {
        let router = Router::new().route("/api/odds/:sport", get(|| async { "not json" }));
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let err = client.fetch_odds(Sport::Nba).await.unwrap_err();
        assert!(matches!(err, OddsError::Transport(_)));
    }

    #[tokio::test]
    async fn test_fetch_odds_network_failure() {
        let client = LedgerClient::new(closed_port_url().await).unwrap();

        let err = client.fetch_odds(Sport::Nba).await.unwrap_err();
        assert!(matches!(err, OddsError::Transport(_)));
        assert!(err.to_string().contains("error sending request"));
    }

    #[tokio::test]
    async fn test_make_pick_sends_exact_body() {
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let bodies_in_handler = bodies.clone();

        let router = Router::new().route(
            "/api/make-pick",
            post(move |Json(body): Json<Value>| {
                let bodies = bodies_in_handler.clone();
                async move {
                    bodies.lock().unwrap().push(body);
                    Json(json!({"success": true, "pick": {"id": 42, "status": "pending"}}))
                }
            }),
        );
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let pick = PickSubmission::new("G".into(), "T".into(), Some(150));
        let recorded = client.make_pick(&pick).await.unwrap();

        assert_eq!(recorded.id.to_string(), "42");
        assert_eq!(
            bodies.lock().unwrap()[0],
            json!({"game_id": "G", "selected_team": "T", "odds": 150, "market_type": "h2h"})
        );
    }

    #[tokio::test]
    async fn test_make_pick_ignores_http_status() {
        // Statut 500 mais success = true : le pari est considéré enregistré
        let router = Router::new().route(
            "/api/make-pick",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"success": true, "pick": {"id": "pick_1"}})),
                )
            }),
        );
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let pick = PickSubmission::new("G".into(), "T".into(), None);
        let recorded = client.make_pick(&pick).await.unwrap();
        assert_eq!(recorded.id.to_string(), "pick_1");
    }

    #[tokio::test]
    async fn test_make_pick_rejected_and_missing() {
        let router = Router::new()
            .route(
                "/api/make-pick",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"success": false, "error": "Missing required field: odds"})),
                    )
                }),
            )
            .route("/other/api/make-pick", post(|| async { Json(json!({"success": true})) }));
        let base = spawn_backend(router).await;
        let pick = PickSubmission::new("G".into(), "T".into(), None);

        let rejected = LedgerClient::new(base.clone()).unwrap().make_pick(&pick).await.unwrap_err();
        assert_eq!(rejected.to_string(), "Missing required field: odds");

        let missing = LedgerClient::new(format!("{}/other", base))
            .unwrap()
            .make_pick(&pick)
            .await
            .unwrap_err();
        assert!(matches!(missing, PickError::MissingPick));
    }

    #[tokio::test]
    async fn test_health() {
        let router = Router::new().route(
            "/",
            get(|| async {
                Json(json!({
                    "status": "success",
                    "message": "Top Ledger Flask API is running",
                    "timestamp": "2024-01-14T12:00:00"
                }))
            }),
        );
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let health = client.health(Duration::from_secs(5)).await.unwrap();
        assert_eq!(health.status, "success");

        let down = LedgerClient::new(closed_port_url().await).unwrap();
        assert!(down.health(Duration::from_secs(5)).await.is_err());
    }

    #[tokio::test]
    async fn test_health_gives_up_on_silent_backend() {
        let router = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Json(json!({"status": "success"}))
            }),
        );
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let started = std::time::Instant::now();
        let err = client.health(Duration::from_millis(200)).await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(err.to_string().contains("Pas de réponse"));
    }

    #[tokio::test]
    async fn test_fetch_odds_skips_malformed_games() {
        let router = Router::new().route(
            "/api/odds/:sport",
            get(|| async {
                let mut broken = game_json("broken");
                broken["commence_time"] = json!("next tuesday");
                Json(json!({
                    "success": true,
                    "games": [game_json("ok-1"), broken, {"home_team": "Nobody"}, game_json("ok-2")]
                }))
            }),
        );
        let client = LedgerClient::new(spawn_backend(router).await).unwrap();

        let page = client.fetch_odds(Sport::Nba).await.unwrap();
        let ids: Vec<&str> = page.games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["ok-1", "ok-2"]);
    }
}
