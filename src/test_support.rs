// ============================================================================
// Helpers de test : faux backend HTTP
// ============================================================================

use axum::Router;
use tokio::net::TcpListener;

/// Lance un routeur axum sur un port libre et retourne son origine
pub(crate) async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Origine d'un port qui n'écoute plus (connexion refusée)
pub(crate) async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
