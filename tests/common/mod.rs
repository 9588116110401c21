use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/posthole");
        cmd.env("POSTHOLE_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }
}

/// A server spawned with extra environment, for tests that need non-default
/// config (feature flags, broken database). Killed on drop so each test
/// cleans up after itself.
#[allow(dead_code)]
pub struct ScopedServer {
    pub base_url: String,
    child: Child,
}

impl Drop for ScopedServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

#[allow(dead_code)]
pub async fn spawn_with_env(vars: &[(&str, &str)]) -> Result<ScopedServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let mut cmd = Command::new("target/debug/posthole");
    cmd.env("POSTHOLE_PORT", port.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    for (key, value) in vars {
        cmd.env(key, value);
    }

    let child = cmd.spawn().context("failed to spawn server binary")?;
    let server = ScopedServer { base_url, child };
    wait_ready(&server.base_url, Duration::from_secs(10)).await?;
    Ok(server)
}

async fn wait_ready(base_url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let deadline = Instant::now() + timeout;
    loop {
        if Instant::now() > deadline {
            break;
        }
        let url = format!("{}/health", base_url);
        if let Ok(resp) = client.get(&url).send().await {
            // Consider server ready on any non-404 response
            if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    anyhow::bail!("server did not become ready on {} within {:?}", base_url, timeout)
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    wait_ready(&server.base_url, Duration::from_secs(10)).await?;
    Ok(server)
}
