use anyhow::Result;
use clap::Parser;
use echo_probe::icmp::MAX_PAYLOAD_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Send ICMP echo requests to an IPv4 host.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Destination host name or IPv4 address
    #[arg(short, long)]
    pub destination: String,

    /// Time to wait for each reply, in milliseconds
    #[arg(short = 'w', long)]
    pub timeout_ms: Option<u64>,

    /// Number of echo requests to send
    #[arg(short, long)]
    pub count: Option<u16>,

    /// Payload size in bytes
    #[arg(short = 'l', long)]
    pub size: Option<usize>,

    /// Delay between consecutive requests, in milliseconds
    #[arg(short, long)]
    pub interval_ms: Option<u64>,

    #[arg(long)]
    pub log_level: Option<String>,

    /// JSON file with defaults for the options above (falls back to $PING_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PingConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_count")]
    pub count: u16,
    #[serde(default = "default_payload_size")]
    pub payload_size: usize,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_count() -> u16 {
    5
}

fn default_payload_size() -> usize {
    32
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            count: default_count(),
            payload_size: default_payload_size(),
            interval_ms: default_interval_ms(),
            log_level: default_log_level(),
        }
    }
}

impl PingConfig {
    /// Builds the effective configuration: file values (if any) overridden
    /// by command-line flags.
    pub async fn load(args: &Args) -> Result<Self> {
        let path = args
            .config
            .clone()
            .or_else(|| std::env::var_os("PING_CONFIG").map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::load_file_config(&path).await?,
            None => Self::default(),
        };
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    async fn load_file_config(file_path: &Path) -> Result<Self> {
        if !file_path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", file_path.display()));
        }

        let content = fs::read_to_string(file_path).await?;
        let config: PingConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(timeout_ms) = args.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(count) = args.count {
            self.count = count;
        }
        if let Some(size) = args.size {
            self.payload_size = size;
        }
        if let Some(interval_ms) = args.interval_ms {
            self.interval_ms = interval_ms;
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.get_tracing_level()?;
        if self.payload_size > MAX_PAYLOAD_SIZE {
            return Err(anyhow::anyhow!(
                "Payload size {} exceeds the maximum of {} bytes",
                self.payload_size,
                MAX_PAYLOAD_SIZE
            ));
        }
        if self.count == 0 {
            return Err(anyhow::anyhow!("Count must be at least 1"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the log level as a tracing::Level
    pub fn get_tracing_level(&self) -> Result<tracing::Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(tracing::Level::TRACE),
            "debug" => Ok(tracing::Level::DEBUG),
            "info" => Ok(tracing::Level::INFO),
            "warn" | "warning" => Ok(tracing::Level::WARN),
            "error" => Ok(tracing::Level::ERROR),
            _ => Err(anyhow::anyhow!("Invalid log level: {}. Valid levels are: trace, debug, info, warn, error", self.log_level))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["echo-probe", "-d", "127.0.0.1"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: PingConfig = serde_json::from_str(r#"{ "count": 3 }"#).unwrap();
        assert_eq!(config, PingConfig { count: 3, ..PingConfig::default() });
    }

    #[test]
    fn flags_override_file_values() {
        let mut config = PingConfig { timeout_ms: 100, count: 9, ..PingConfig::default() };
        config.apply_args(&args(&["-w", "250", "-l", "1", "--log-level", "debug"]));
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.count, 9);
        assert_eq!(config.payload_size, 1);
        assert_eq!(config.get_tracing_level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn rejects_invalid_values() {
        let oversized = PingConfig { payload_size: MAX_PAYLOAD_SIZE + 1, ..PingConfig::default() };
        assert!(oversized.validate().is_err());
        let no_probes = PingConfig { count: 0, ..PingConfig::default() };
        assert!(no_probes.validate().is_err());
        let bad_level = PingConfig { log_level: "loud".into(), ..PingConfig::default() };
        assert!(bad_level.validate().is_err());
        assert!(PingConfig::default().validate().is_ok());
    }

    #[tokio::test]
    async fn loads_config_file() {
        let path = std::env::temp_dir().join(format!("echo-probe-{}.json", std::process::id()));
        fs::write(&path, r#"{ "timeout_ms": 750, "payload_size": 56 }"#).await.unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let config = PingConfig::load(&args(&["--config", &path_arg, "-c", "2"])).await.unwrap();
        fs::remove_file(&path).await.unwrap();

        assert_eq!(config.timeout_ms, 750);
        assert_eq!(config.payload_size, 56);
        assert_eq!(config.count, 2);
    }

    #[tokio::test]
    async fn missing_config_file_is_an_error() {
        let result = PingConfig::load(&args(&["--config", "/nonexistent/echo-probe.json"])).await;
        assert!(result.is_err());
    }
}
