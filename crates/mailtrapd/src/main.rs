// # mailtrapd - Mailtrap reconciliation bridge
//
// Thin integration layer between an orchestrator and the reconciliation
// engine. All lifecycle logic lives in `mailtrap-core` and
// `mailtrap-resources`; this binary only wires them together.
//
// Responsibilities:
// 1. Reading configuration from environment variables
// 2. Initializing logging (stderr; stdout is the protocol channel)
// 3. Registering resource and data source types
// 4. Serving one JSON request per stdin line with one JSON response per
//    stdout line, until EOF or SIGINT
//
// ## Configuration
//
// - `MAILTRAP_API_TOKEN`: API token (required)
// - `MAILTRAP_ACCOUNT_ID`: Default account id (optional)
// - `MAILTRAP_BASE_URL`: Management API base override (optional)
// - `MAILTRAP_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Protocol
//
// ```text
// > {"verb":"create","type_name":"mailtrap_project","planned":{"name":"alpha"}}
// < {"state":{"id":7,"account_id":1,"name":"alpha",...}}
// > {"verb":"delete","type_name":"mailtrap_sending_domain","prior":{"id":5,"account_id":1}}
// < {"diagnostics":[{"severity":"warning","summary":"Resource Not Deleted",...}]}
// ```

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use mailtrap_core::config::{ProviderConfig, ProviderSettings};
use mailtrap_core::{AttributeMap, Diagnostic, Diagnostics, Engine, ProviderContext, Response, TypeRegistry};
use mailtrap_http::HttpTransport;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Clean shutdown (EOF or SIGINT)
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum BridgeExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<BridgeExitCode> for ExitCode {
    fn from(code: BridgeExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// One orchestrator request
#[derive(Debug, Deserialize)]
#[serde(tag = "verb", rename_all = "snake_case")]
enum Request {
    Schemas,
    Validate {
        type_name: String,
        #[serde(default)]
        config: AttributeMap,
    },
    ValidateDataSource {
        type_name: String,
        #[serde(default)]
        config: AttributeMap,
    },
    Plan {
        type_name: String,
        #[serde(default)]
        prior: Option<AttributeMap>,
        #[serde(default)]
        config: AttributeMap,
    },
    Create {
        type_name: String,
        #[serde(default)]
        prior: Option<AttributeMap>,
        planned: AttributeMap,
    },
    Read {
        type_name: String,
        prior: Option<AttributeMap>,
    },
    Update {
        type_name: String,
        prior: Option<AttributeMap>,
        planned: AttributeMap,
    },
    Delete {
        type_name: String,
        prior: Option<AttributeMap>,
    },
    Import {
        type_name: String,
        #[serde(default)]
        prior: Option<AttributeMap>,
        id: String,
    },
    ReadDataSource {
        type_name: String,
        #[serde(default)]
        config: AttributeMap,
    },
}

fn log_level(raw: &str) -> Level {
    match raw.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> ExitCode {
    let level = log_level(&env::var("MAILTRAP_LOG_LEVEL").unwrap_or_default());
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return BridgeExitCode::ConfigError.into();
    }

    let engine = match build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return BridgeExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return BridgeExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match serve(&engine).await {
            Ok(()) => BridgeExitCode::CleanShutdown,
            Err(e) => {
                error!("Bridge error: {:#}", e);
                BridgeExitCode::RuntimeError
            }
        }
    });

    code.into()
}

/// Resolve configuration and assemble the engine
fn build_engine() -> Result<Engine> {
    let config = ProviderConfig::resolve(&ProviderSettings::default(), |key| env::var(key).ok())?;
    info!("Configuration loaded: {:?}", config);

    let transport = HttpTransport::new(&config).context("failed to build HTTP transport")?;

    let mut registry = TypeRegistry::new();
    mailtrap_resources::register(&mut registry);
    info!(
        "Registered {} resource type(s), {} data source type(s)",
        registry.list_resources().len(),
        registry.list_data_sources().len()
    );

    Ok(Engine::new(
        registry,
        ProviderContext::from_config(Arc::new(transport), &config),
    ))
}

/// Answer requests until EOF or SIGINT
async fn serve(engine: &Engine) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Ready for requests");
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read request")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down");
                return Ok(());
            }
        };

        let Some(line) = line else {
            info!("Input closed, shutting down");
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = handle_line(engine, &line).await?;
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
}

/// Decode, dispatch and encode one request line
async fn handle_line(engine: &Engine, line: &str) -> Result<String> {
    let reply = match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(engine, request).await?,
        Err(e) => {
            debug!("Rejected request line: {}", e);
            let mut diagnostics = Diagnostics::new();
            diagnostics.push(Diagnostic::error("Invalid Request", e.to_string()));
            serde_json::to_value(Response {
                state: None,
                diagnostics,
            })?
        }
    };
    Ok(serde_json::to_string(&reply)?)
}

async fn dispatch(engine: &Engine, request: Request) -> Result<Value> {
    let reply = match request {
        Request::Schemas => serde_json::to_value(engine.schemas())?,
        Request::Validate { type_name, config } => {
            serde_json::to_value(engine.validate(&type_name, &config))?
        }
        Request::ValidateDataSource { type_name, config } => {
            serde_json::to_value(engine.validate_data_source(&type_name, &config))?
        }
        Request::Plan {
            type_name,
            prior,
            config,
        } => serde_json::to_value(engine.plan(&type_name, prior.as_ref(), &config))?,
        Request::Create {
            type_name,
            prior,
            planned,
        } => serde_json::to_value(engine.create(&type_name, prior.as_ref(), &planned).await)?,
        Request::Read { type_name, prior } => {
            serde_json::to_value(engine.read(&type_name, prior.as_ref()).await)?
        }
        Request::Update {
            type_name,
            prior,
            planned,
        } => serde_json::to_value(engine.update(&type_name, prior.as_ref(), &planned).await)?,
        Request::Delete { type_name, prior } => {
            serde_json::to_value(engine.delete(&type_name, prior.as_ref()).await)?
        }
        Request::Import {
            type_name,
            prior,
            id,
        } => serde_json::to_value(engine.import(&type_name, prior.as_ref(), &id))?,
        Request::ReadDataSource { type_name, config } => {
            serde_json::to_value(engine.read_data_source(&type_name, &config).await)?
        }
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offline_engine() -> Engine {
        // Nothing listens on the discard port; no test here reaches the network
        let config = ProviderConfig::new("test-token", 1)
            .with_endpoints(mailtrap_core::Endpoints::uniform("http://127.0.0.1:9"));
        let transport = HttpTransport::new(&config).unwrap();
        let mut registry = TypeRegistry::new();
        mailtrap_resources::register(&mut registry);
        Engine::new(registry, ProviderContext::from_config(Arc::new(transport), &config))
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(log_level("DEBUG"), Level::DEBUG);
        assert_eq!(log_level("warn"), Level::WARN);
        assert_eq!(log_level(""), Level::INFO);
        assert_eq!(log_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_request_parsing() {
        let request: Request = serde_json::from_value(json!({
            "verb": "import",
            "type_name": "mailtrap_inbox",
            "id": "1/2",
        }))
        .unwrap();
        assert!(matches!(request, Request::Import { ref id, prior: None, .. } if id == "1/2"));

        let request: Request = serde_json::from_value(json!({"verb": "schemas"})).unwrap();
        assert!(matches!(request, Request::Schemas));
    }

    #[tokio::test]
    async fn test_invalid_line_yields_diagnostic() {
        let engine = offline_engine();
        let reply = handle_line(&engine, r#"{"verb":"explode"}"#).await.unwrap();
        let reply: Value = serde_json::from_str(&reply).unwrap();

        assert_eq!(reply["diagnostics"][0]["summary"], "Invalid Request");
        assert!(reply.get("state").is_none());
    }

    #[tokio::test]
    async fn test_schemas_reply() {
        let engine = offline_engine();
        let reply = handle_line(&engine, r#"{"verb":"schemas"}"#).await.unwrap();
        let reply: Value = serde_json::from_str(&reply).unwrap();

        assert_eq!(reply["provider"]["type_name"], "mailtrap");
        assert_eq!(reply["resources"].as_array().unwrap().len(), 3);
        assert_eq!(reply["data_sources"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_import_reply_needs_no_network() {
        let engine = offline_engine();
        let line = r#"{"verb":"import","type_name":"mailtrap_project","id":"12/34"}"#;
        let reply: Value = serde_json::from_str(&handle_line(&engine, line).await.unwrap()).unwrap();

        assert_eq!(reply["state"], json!({"account_id": 12, "id": 34}));
    }

    #[tokio::test]
    async fn test_validate_reply_lists_errors() {
        let engine = offline_engine();
        let line = r#"{"verb":"validate","type_name":"mailtrap_project","config":{"name":"a"}}"#;
        let reply: Value = serde_json::from_str(&handle_line(&engine, line).await.unwrap()).unwrap();

        assert_eq!(reply[0]["summary"], "Invalid Attribute Value Length");
        assert_eq!(reply[0]["attribute"], "name");
    }
}
