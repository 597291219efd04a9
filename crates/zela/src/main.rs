// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zela - a WhatsApp personal finance assistant.
//!
//! This is the binary entry point.

mod assistant;
mod serve;
mod shutdown;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use zela_config::model::ZelaConfig;

/// Zela - a WhatsApp personal finance assistant.
#[derive(Parser, Debug)]
#[command(name = "zela", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook and panel server.
    Serve,
    /// Validate the configuration and report problems.
    CheckConfig {
        /// Check this file instead of the standard search path.
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let config = load_or_exit(None);
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("zela: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig { path }) => {
            let config = load_or_exit(path.as_deref());
            println!(
                "zela: config ok (agent.name={}, gateway={}:{}, database={})",
                config.agent.name,
                config.gateway.host,
                config.gateway.port,
                config.storage.database_path,
            );
        }
        None => {
            println!("zela: use --help for available commands");
        }
    }
}

/// Loads and validates configuration, rendering diagnostics and exiting on error.
fn load_or_exit(path: Option<&std::path::Path>) -> ZelaConfig {
    let loaded = match path {
        Some(path) => zela_config::load_and_validate_path(path),
        None => zela_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            zela_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn parses_serve() {
        let cli = Cli::try_parse_from(["zela", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn parses_check_config_with_path() {
        let cli = Cli::try_parse_from(["zela", "check-config", "--path", "/tmp/zela.toml"]).unwrap();
        match cli.command {
            Some(Commands::CheckConfig { path }) => {
                assert_eq!(path, Some(PathBuf::from("/tmp/zela.toml")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["zela", "shell"]).is_err());
    }

    #[test]
    fn check_config_accepts_a_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zela.toml");
        std::fs::write(
            &path,
            "[gateway]\nport = 9000\n\n[identity]\ncountry_code = \"55\"\n",
        )
        .unwrap();
        let config = zela_config::load_and_validate_path(&path).unwrap();
        assert_eq!(config.gateway.port, 9000);
    }
}
