//! Integration tests for the wanderlust binary

use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wanderlust::{
    GenerationClient, GenerationError, api::AppState, config::ServerConfig, metrics::Metrics, web,
};

fn wanderlust(args: &[&str]) -> Output {
    let config = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
    Command::new(env!("CARGO_BIN_EXE_wanderlust"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("PORT")
        .output()
        .expect("Failed to execute wanderlust")
}

/// Test that the CLI lists its subcommands
#[test]
fn test_cli_help() {
    let output = wanderlust(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Travel itinerary generator"));
    for command in ["serve", "prompt", "plan"] {
        assert!(stdout.contains(command), "missing {command}");
    }
}

/// Test the prompt command with a lowercase country, a negative duration and a month prefix
#[test]
fn test_prompt_command() {
    let output = wanderlust(&[
        "prompt",
        "--destination",
        "japan",
        "--days",
        "-2",
        "--month",
        "sep",
        "--no-hotels",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Write me an itinerary for -2 days to Japan in the coming September."));
    assert!(!stdout.contains("- Hotel"));
    assert!(stdout.contains("- 2 Restaurants"));
}

#[test]
fn test_prompt_command_verbose() {
    let output = wanderlust(&["--verbose", "prompt", "-d", "Atlantis"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("5 days to Atlantis in the coming Any month."));
}

#[test]
fn test_unknown_month_is_rejected() {
    let output = wanderlust(&["prompt", "-d", "Italy", "--month", "Smarch"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Smarch"));
    assert!(output.stdout.is_empty());
}

/// Replies with fixed markup and keeps the prompts it saw
struct ScriptedClient {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("<h1>**Rome**</h1>\\n<p>*Colosseum*</p>".to_string())
    }
}

async fn spawn_server(client: Arc<ScriptedClient>) -> String {
    let metrics = Arc::new(Metrics::new().unwrap());
    let app = web::app(AppState::new(client, metrics), &ServerConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn run_blocking(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        wanderlust(&args)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plan_against_running_server() {
    let client = Arc::new(ScriptedClient {
        prompts: Mutex::new(Vec::new()),
    });
    let url = spawn_server(client.clone()).await;

    let args = ["plan", "-d", "italy", "--days", "3", "--endpoint", &url];
    let output = run_blocking(args.iter().map(|arg| arg.to_string()).collect()).await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "<h1> Rome </h1>\n<p> Colosseum </p>\n");

    let prompts = client.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Write me an itinerary for 3 days to Italy"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plan_raw_output() {
    let client = Arc::new(ScriptedClient {
        prompts: Mutex::new(Vec::new()),
    });
    let url = spawn_server(client).await;

    let args = ["plan", "-d", "Spain", "--raw", "--endpoint", &url];
    let output = run_blocking(args.iter().map(|arg| arg.to_string()).collect()).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "<h1>**Rome**</h1>\\n<p>*Colosseum*</p>\n");
}

#[test]
fn test_plan_against_unreachable_server_fails() {
    let output = wanderlust(&["plan", "-d", "Spain", "--endpoint", "http://127.0.0.1:9"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to generate content"));
}
