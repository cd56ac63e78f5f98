use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reqwest::Url;

use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(name = "interview-dashboard", version, about = "Live interview scheduling dashboard")]
pub struct Cli {
    #[command(flatten)]
    pub sync: SyncArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the dashboard every time it changes (default)
    Watch,
    /// Serve the dashboard as a local JSON API
    Web {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Base url of the scheduler API
    #[arg(long, env = "DASHBOARD_API_URL", default_value = "http://localhost:8001")]
    pub api_url: String,

    /// Push channel endpoint, `ws://` or `wss://`
    #[arg(long, env = "DASHBOARD_WEBSOCKET_URL", default_value = "ws://localhost:8001")]
    pub websocket_url: String,

    /// Where the focused panel is remembered between runs
    #[arg(long, env = "DASHBOARD_STATE_DIR")]
    pub state_dir: Option<PathBuf>,
}

/// Everything the view controller needs to start
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api_url: Url,
    pub websocket_url: String,
    pub state_dir: PathBuf,
}

impl SyncConfig {
    pub fn from_args(args: &SyncArgs) -> Result<Self, ConfigError> {
        let api_url = Url::parse(&args.api_url).map_err(|e| ConfigError::ApiUrl {
            url: args.api_url.clone(),
            reason: e.to_string(),
        })?;
        if api_url.cannot_be_a_base() {
            return Err(ConfigError::ApiUrl {
                url: args.api_url.clone(),
                reason: "not a base url".to_string(),
            });
        }

        let websocket_url = Url::parse(&args.websocket_url).map_err(|e| ConfigError::WebsocketUrl {
            url: args.websocket_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(websocket_url.scheme(), "ws" | "wss") {
            return Err(ConfigError::WebsocketUrl {
                url: args.websocket_url.clone(),
                reason: format!("unsupported scheme {:?}", websocket_url.scheme()),
            });
        }

        let state_dir = match &args.state_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir().ok_or(ConfigError::NoStateDir)?.join("interview-dashboard"),
        };

        Ok(SyncConfig {
            api_url,
            websocket_url: args.websocket_url.clone(),
            state_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(api_url: &str, state_dir: Option<&str>) -> SyncArgs {
        SyncArgs {
            api_url: api_url.to_string(),
            websocket_url: "ws://localhost:8001".to_string(),
            state_dir: state_dir.map(PathBuf::from),
        }
    }

    fn with_websocket(websocket_url: &str) -> SyncArgs {
        SyncArgs {
            websocket_url: websocket_url.to_string(),
            ..args("http://localhost:8001", Some("/tmp"))
        }
    }

    #[test]
    fn builds_config_from_args() {
        let config =
            SyncConfig::from_args(&args("http://localhost:8001", Some("/tmp/dash"))).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8001/");
        assert_eq!(config.websocket_url, "ws://localhost:8001");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/dash"));
    }

    #[test]
    fn rejects_bad_api_urls() {
        assert!(matches!(
            SyncConfig::from_args(&args("not a url", Some("/tmp"))),
            Err(ConfigError::ApiUrl { .. })
        ));
        assert!(matches!(
            SyncConfig::from_args(&args("mailto:someone@example.com", Some("/tmp"))),
            Err(ConfigError::ApiUrl { .. })
        ));
    }

    #[test]
    fn accepts_plain_and_tls_push_urls() {
        let config = SyncConfig::from_args(&with_websocket("wss://scheduler.example.com")).unwrap();
        assert_eq!(config.websocket_url, "wss://scheduler.example.com");
        assert!(SyncConfig::from_args(&with_websocket("ws://127.0.0.1:8001")).is_ok());
    }

    #[test]
    fn rejects_non_websocket_push_urls() {
        for url in ["http://localhost:8001", "localhost:8001", "not a url"] {
            assert!(matches!(
                SyncConfig::from_args(&with_websocket(url)),
                Err(ConfigError::WebsocketUrl { .. })
            ));
        }
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from([
            "interview-dashboard",
            "--api-url",
            "http://backend:9000",
            "web",
            "--port",
            "9090",
        ])
        .unwrap();
        assert_eq!(cli.sync.api_url, "http://backend:9000");
        assert!(matches!(cli.command, Some(Command::Web { port: 9090 })));

        let cli = Cli::try_parse_from(["interview-dashboard"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
