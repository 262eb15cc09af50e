#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool, Postgres, Transaction};
use tower::ServiceExt;

use jobly_api::auth::{generate_jwt, Claims};

// ---------------------------------------------------------------------------
// Router-level helpers
// ---------------------------------------------------------------------------

/// Router over a pool that never connects. Good for paths that are rejected
/// before any query runs (auth, validation, bad ids).
pub fn lazy_app() -> Router {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://localhost:1/jobly_unreachable")
        .expect("lazy pool");
    jobly_api::app(pool)
}

pub fn admin_token() -> String {
    generate_jwt(&Claims::new("admin", true)).expect("admin token")
}

pub fn user_token() -> String {
    generate_jwt(&Claims::new("u1", false)).expect("user token")
}

/// Sends one request through `app` and returns the status and JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// ---------------------------------------------------------------------------
// Database helpers
// ---------------------------------------------------------------------------

const FIXTURE_SQL: &str = r#"
CREATE TEMP TABLE companies (
  handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
  name TEXT UNIQUE NOT NULL,
  num_employees INTEGER CHECK (num_employees >= 0),
  description TEXT NOT NULL,
  logo_url TEXT
);

CREATE TEMP TABLE jobs (
  id SERIAL PRIMARY KEY,
  title TEXT NOT NULL,
  salary INTEGER CHECK (salary >= 0),
  equity NUMERIC CHECK (equity <= 1.0),
  company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
);

INSERT INTO companies (handle, name, num_employees, description, logo_url)
VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
       ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
       ('c3', 'C3', 3, 'Desc3', 'http://c3.img');

INSERT INTO jobs (title, salary, equity, company_handle)
VALUES ('job1', 10000, 0, 'c1'),
       ('job2', 20000, 0, 'c1'),
       ('job3', 80000, 0.1, 'c2'),
       ('job4', 100000, 1.0, 'c3');
"#;

/// Fresh fixture data inside a transaction that is rolled back on drop.
///
/// The temporary `companies` / `jobs` tables shadow any real ones for this
/// connection only, so tests can run in parallel against a shared database.
pub struct TestDb {
    pub tx: Transaction<'static, Postgres>,
    _pool: PgPool,
}

impl TestDb {
    pub async fn job_id(&mut self, title: &str) -> i32 {
        sqlx::query_scalar("SELECT id FROM jobs WHERE title = $1")
            .bind(title)
            .fetch_one(&mut *self.tx)
            .await
            .expect("fixture job")
    }
}

/// `None` (with a notice) when `DATABASE_URL` is not set.
pub async fn test_db() -> Option<TestDb> {
    let _ = dotenvy::dotenv();
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping database test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");
    let mut tx = pool.begin().await.expect("begin transaction");
    (&mut *tx).execute(FIXTURE_SQL).await.expect("load fixtures");

    Some(TestDb { tx, _pool: pool })
}

/// Router over a one-connection pool whose session holds the fixture tables.
///
/// Every request reuses that connection, so the routes see the TEMP tables;
/// they disappear when the pool is dropped at the end of the test.
pub struct DbApp {
    pub pool: PgPool,
}

impl DbApp {
    pub fn app(&self) -> Router {
        jobly_api::app(self.pool.clone())
    }

    pub async fn job_id(&self, title: &str) -> i32 {
        sqlx::query_scalar("SELECT id FROM jobs WHERE title = $1")
            .bind(title)
            .fetch_one(&self.pool)
            .await
            .expect("fixture job")
    }
}

/// `None` (with a notice) when `DATABASE_URL` is not set.
pub async fn db_app() -> Option<DbApp> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute(FIXTURE_SQL).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");

    Some(DbApp { pool })
}

// ---------------------------------------------------------------------------
// Spawned server
// ---------------------------------------------------------------------------

/// The `jobly-api` binary on a free port; killed on drop.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_jobly-api"))
            .env("PORT", port.to_string())
            .env("DATABASE_CONNECTION_TIMEOUT", "2")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self { port, base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&self.base_url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
