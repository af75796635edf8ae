//! CLI argument definitions for oomwatch-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// oomwatch OOM event pipeline daemon.
///
/// Runs as a syslog-ng destination program: reads
/// `<unix-timestamp> <hostname> <message>` lines on stdin, resolves the
/// killed container's service metadata, and fans the event out to the
/// structured event stream, the operator log, and metrics.
#[derive(Parser, Debug)]
#[command(name = "oomwatch-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Use containerd to inspect containers, otherwise use docker.
    #[arg(long)]
    pub containerd: bool,

    /// Path to oomwatch.toml configuration file.
    #[arg(short, long, default_value = "/etc/oomwatch/oomwatch.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_docker_backend() {
        let cli = DaemonCli::parse_from(["oomwatch-daemon"]);
        assert!(!cli.containerd);
        assert_eq!(cli.config, PathBuf::from("/etc/oomwatch/oomwatch.toml"));
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn containerd_flag_is_parsed() {
        let cli = DaemonCli::parse_from(["oomwatch-daemon", "--containerd"]);
        assert!(cli.containerd);
    }

    #[test]
    fn overrides_are_parsed() {
        let cli = DaemonCli::parse_from([
            "oomwatch-daemon",
            "--config",
            "/tmp/o.toml",
            "--log-level",
            "debug",
            "--log-format",
            "pretty",
        ]);
        assert_eq!(cli.config, PathBuf::from("/tmp/o.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_format.as_deref(), Some("pretty"));
    }
}
