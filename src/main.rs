#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::uninlined_format_args
)]

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use planpoker::{gateway, Config};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CompletionShell {
    #[value(name = "bash")]
    Bash,
    #[value(name = "fish")]
    Fish,
    #[value(name = "zsh")]
    Zsh,
    #[value(name = "powershell")]
    PowerShell,
    #[value(name = "elvish")]
    Elvish,
}

/// `planpoker` - in-memory planning poker backend.
#[derive(Parser, Debug)]
#[command(name = "planpoker")]
#[command(version)]
#[command(about = "Create planning poker sessions and let players join by name.", long_about = None)]
struct Cli {
    /// Directory holding config.toml (overrides PLANPOKER_CONFIG_DIR)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    #[command(long_about = "\
Start the HTTP server.

Serves the session API (POST /sessions, GET /sessions/{id}, \
POST /sessions/{id}/join). Bind address defaults to the values in \
your config file (gateway.host / gateway.port).

Examples:
  planpoker serve                  # use config defaults
  planpoker serve -p 9000          # listen on port 9000
  planpoker serve --host 127.0.0.1 # bind to loopback only
  planpoker serve -p 0             # random available port")]
    Serve {
        /// Port to listen on (use 0 for random available port); defaults to config gateway.port
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to; defaults to config gateway.host
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completion script to stdout
    #[command(long_about = "\
Generate shell completion scripts for `planpoker`.

Examples:
  source <(planpoker completions bash)
  planpoker completions zsh > ~/.zfunc/_planpoker")]
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(config_dir) = &cli.config_dir {
        if config_dir.as_os_str().is_empty() {
            bail!("--config-dir cannot be empty");
        }
    }

    // Completions must remain stdout-only and should not load config or initialize logging.
    if let Commands::Completions { shell } = &cli.command {
        let mut stdout = std::io::stdout().lock();
        write_shell_completion(*shell, &mut stdout)?;
        return Ok(());
    }

    // Initialize logging - respects RUST_LOG env var, defaults to INFO
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(cli.config_dir.as_deref()).await?;

    match cli.command {
        Commands::Completions { .. } => Ok(()),

        Commands::Serve { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting planpoker on {host} (random port)");
            } else {
                info!("Starting planpoker on {host}:{port}");
            }
            gateway::run_gateway(&host, port, config).await
        }
    }
}

fn write_shell_completion<W: Write>(shell: CompletionShell, writer: &mut W) -> Result<()> {
    use clap_complete::generate;
    use clap_complete::shells;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut cmd, bin_name, writer),
        CompletionShell::Fish => generate(shells::Fish, &mut cmd, bin_name, writer),
        CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, bin_name, writer),
        CompletionShell::PowerShell => generate(shells::PowerShell, &mut cmd, bin_name, writer),
        CompletionShell::Elvish => generate(shells::Elvish, &mut cmd, bin_name, writer),
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_parses_port_and_host() {
        let cli = Cli::try_parse_from(["planpoker", "serve", "-p", "9000", "--host", "127.0.0.1"])
            .expect("serve invocation should parse");
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(9000));
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }

    #[test]
    fn config_dir_is_global() {
        let cli = Cli::try_parse_from(["planpoker", "serve", "--config-dir", "/tmp/pp"])
            .expect("global flag should parse after subcommand");
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/pp")));
    }

    #[test]
    fn completions_cli_parses_supported_shells() {
        for shell in ["bash", "fish", "zsh", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["planpoker", "completions", shell])
                .expect("completions invocation should parse");
            match cli.command {
                Commands::Completions { .. } => {}
                other => panic!("expected completions command, got {other:?}"),
            }
        }
    }

    #[test]
    fn completion_generation_mentions_binary_name() {
        let mut output = Vec::new();
        write_shell_completion(CompletionShell::Bash, &mut output)
            .expect("completion generation should succeed");
        let script = String::from_utf8(output).expect("completion output should be valid utf-8");
        assert!(
            script.contains("planpoker"),
            "completion script should reference binary name"
        );
    }
}
