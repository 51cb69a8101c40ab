pub mod db;
pub mod scraper;
pub mod summary_llm;

pub use db::DbAdapter;
pub use scraper::FirecrawlAdapter;
pub use summary_llm::GatewaySummaryAdapter;

/// Serves `router` on an ephemeral local port and returns its base URL.
#[cfg(test)]
pub(crate) async fn spawn_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
