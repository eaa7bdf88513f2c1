use std::net::SocketAddr;
use std::sync::Arc;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::counter::repository::mock::MockCounterStore;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use uuid::Uuid;

use server::routes::ServerState;
use server::startup::{build_app, build_state, serve};

struct TestApp {
    base_url: String,
    _shutdown: oneshot::Sender<()>,
}

/// Config pointing at a private in-memory database and a throwaway static dir.
async fn test_config() -> anyhow::Result<AppConfig> {
    let static_dir = format!("target/test-data/{}/static", Uuid::new_v4());
    tokio::fs::create_dir_all(&static_dir).await?;
    tokio::fs::write(format!("{static_dir}/index.html"), "<h1>clicker</h1>").await?;

    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".into();
    cfg.server.static_dir = static_dir;
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

async fn start_with_state(state: ServerState, cfg: &AppConfig) -> anyhow::Result<TestApp> {
    let app = build_app(state, cfg);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move { let _ = rx.await; };
        if let Err(e) = serve(listener, app, shutdown).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, _shutdown: tx })
}

async fn start_server() -> anyhow::Result<TestApp> {
    let cfg = test_config().await?;
    let state = build_state(&cfg).await?;
    start_with_state(state, &cfg).await
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_fresh_counter_reads_zero() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/money", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"money": 0}));
    Ok(())
}

#[tokio::test]
async fn e2e_three_clicks_in_order() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    for expected in 1..=3 {
        let res = c.post(format!("{}/click", app.base_url)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        assert_eq!(res.json::<serde_json::Value>().await?, json!({"money": expected}));
    }
    let res = c.get(format!("{}/money", app.base_url)).send().await?;
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"money": 3}));
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_clicks_are_all_counted() -> anyhow::Result<()> {
    const K: i64 = 40;
    let app = start_server().await?;
    let c = client();

    let mut handles = Vec::new();
    for _ in 0..K {
        let c = c.clone();
        let url = format!("{}/click", app.base_url);
        handles.push(tokio::spawn(async move {
            let res = c.post(url).send().await?;
            let body = res.json::<serde_json::Value>().await?;
            anyhow::Ok(body["money"].as_i64().unwrap_or(-1))
        }));
    }
    let mut values = Vec::new();
    for h in handles {
        values.push(h.await??);
    }
    values.sort_unstable();
    assert_eq!(values, (1..=K).collect::<Vec<_>>());

    let res = c.get(format!("{}/money", app.base_url)).send().await?;
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"money": K}));
    Ok(())
}

#[tokio::test]
async fn e2e_storage_outage_is_500() -> anyhow::Result<()> {
    let cfg = test_config().await?;
    let store = Arc::new(MockCounterStore::with_value(4));
    let app = start_with_state(ServerState::new(Arc::clone(&store)), &cfg).await?;
    store.set_available(false);

    let res = client().post(format!("{}/click", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body.get("money").is_none());
    assert_eq!(store.peek(), Some(4));

    store.set_available(true);
    let res = client().post(format!("{}/click", app.base_url)).send().await?;
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"money": 5}));
    Ok(())
}

#[tokio::test]
async fn e2e_root_serves_static_page() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.text().await?.contains("clicker"));
    Ok(())
}
