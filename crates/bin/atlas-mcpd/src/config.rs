use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4030";

#[derive(Parser, Debug)]
#[command(name = "atlas-mcpd", version, about = "MongoDB MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "MONGODB_URI")]
    mongodb_uri: Option<String>,

    #[arg(
        long = "stdio",
        env = "ATLAS_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long = "http",
        env = "ATLAS_MCP_HTTP",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    mcp_http: bool,

    #[arg(long, env = "ATLAS_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "ATLAS_MCP_HTTP_STATEFUL",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    http_stateful: bool,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone, Debug)]
pub struct AtlasConfig {
    pub mongodb_uri: String,
    pub enable_stdio: bool,
    pub mcp_http: bool,
    pub mcp_http_addr: SocketAddr,
    pub http_stateful: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl AtlasConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for AtlasConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let mongodb_uri = args
            .mongodb_uri
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("MONGODB_URI"))?;

        if !args.enable_stdio && !args.mcp_http {
            return Err(ConfigError::InvalidSetting {
                name: "ATLAS_ENABLE_STDIO",
                value: "false (no transport left to serve)".to_string(),
            });
        }

        Ok(Self {
            mongodb_uri,
            enable_stdio: args.enable_stdio,
            mcp_http: args.mcp_http,
            mcp_http_addr: args.mcp_http_addr,
            http_stateful: args.http_stateful,
        })
    }
}
