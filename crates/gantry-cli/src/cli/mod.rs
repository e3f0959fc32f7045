//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "gantry",
    bin_name = "gantry",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Environment-driven routing and controller dispatch",
    long_about = "Gantry assembles an application from a .env file and dispatches \
                  web requests and console commands to its controllers.",
    after_help = "EXAMPLES:\n\
        \x20 gantry run hello \"good morning\"\n\
        \x20 gantry serve --port 8080\n\
        \x20 gantry request /product/view/1 --json\n\
        \x20 gantry --env-file prod.env config show",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a console route.
    #[command(
        about = "Run a console command",
        after_help = "EXAMPLES:\n\
            \x20 gantry run hello\n\
            \x20 gantry run hello/index \"hi there\"\n\
            \x20 gantry run alias/resolve @runtime/logs\n\
            \x20 gantry run alias/resolve --alias=@app"
    )]
    Run(RunArgs),

    /// Serve the web entry point over HTTP.
    #[command(
        about = "Start the web server",
        after_help = "EXAMPLES:\n\
            \x20 gantry serve\n\
            \x20 gantry serve --host 0.0.0.0 --port 3000"
    )]
    Serve(ServeArgs),

    /// Send one request through the web dispatcher without a server.
    #[command(
        visible_alias = "req",
        about = "Dispatch a single web request",
        after_help = "EXAMPLES:\n\
            \x20 gantry request /\n\
            \x20 gantry request '/product/index?category_id=2'\n\
            \x20 gantry request -X POST /category/create -d name=Toys\n\
            \x20 gantry request /product/view/1 --json"
    )]
    Request(RequestArgs),

    /// List web route rules and registered actions.
    #[command(
        visible_alias = "ls",
        about = "List routes and actions",
        after_help = "EXAMPLES:\n\
            \x20 gantry routes\n\
            \x20 gantry --output-format json routes"
    )]
    Routes,

    /// Inspect the assembled configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 gantry config show\n\
            \x20 gantry config show --console --format json\n\
            \x20 gantry config path"
    )]
    Config(ConfigCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 gantry completions bash > ~/.local/share/bash-completion/completions/gantry\n\
            \x20 gantry completions zsh  > ~/.zfunc/_gantry\n\
            \x20 gantry completions fish > ~/.config/fish/completions/gantry.fish"
    )]
    Completions(CompletionsArgs),
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Arguments for `gantry run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Route followed by positional arguments and `--name=value` options.
    #[arg(
        value_name = "ROUTE [ARGS]...",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Console route and its arguments"
    )]
    pub argv: Vec<String>,
}

// ── serve ─────────────────────────────────────────────────────────────────────

/// Arguments for `gantry serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long = "host", default_value = "127.0.0.1", help = "Address to bind")]
    pub host: String,

    /// TCP port.
    #[arg(
        short = 'p',
        long = "port",
        env = "GANTRY_PORT",
        default_value_t = 8080,
        help = "Port to listen on"
    )]
    pub port: u16,
}

// ── request ───────────────────────────────────────────────────────────────────

/// Arguments for `gantry request`.
#[derive(Debug, Args)]
pub struct RequestArgs {
    /// Request path, optionally with a query string.
    #[arg(value_name = "PATH", help = "Path such as /product/view/1?format=json")]
    pub path: String,

    /// HTTP method.
    #[arg(
        short = 'X',
        long = "method",
        default_value = "GET",
        help = "Request method"
    )]
    pub method: String,

    /// Form fields for POST, query parameters otherwise.
    #[arg(
        short = 'd',
        long = "data",
        value_name = "KEY=VALUE",
        help = "Request parameter (repeatable)"
    )]
    pub data: Vec<String>,

    /// Extra request headers.
    #[arg(
        short = 'H',
        long = "header",
        value_name = "NAME: VALUE",
        help = "Request header (repeatable)"
    )]
    pub headers: Vec<String>,

    /// Ask for a JSON response.
    #[arg(long = "json", help = "Send Accept: application/json")]
    pub json: bool,

    /// Print status line and headers before the body.
    #[arg(short = 'i', long = "include", help = "Include response headers")]
    pub include: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `gantry completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `gantry config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the assembled configuration with secrets redacted.
    Show {
        /// Show the console variant instead of the web one.
        #[arg(long = "console")]
        console: bool,

        /// Serialisation format.
        #[arg(long = "format", value_enum, default_value = "toml")]
        format: DumpFormat,
    },
    /// Print the path of the environment file in use.
    Path,
}

/// Serialisation format for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    Toml,
    Json,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn run_keeps_option_like_arguments() {
        let cli = Cli::parse_from(["gantry", "run", "alias/resolve", "--alias=@app", "-x"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected Run command");
        };
        assert_eq!(args.argv, ["alias/resolve", "--alias=@app", "-x"]);
    }

    #[test]
    fn run_without_route_parses() {
        let cli = Cli::parse_from(["gantry", "run"]);
        assert!(matches!(cli.command, Commands::Run(RunArgs { argv }) if argv.is_empty()));
    }

    #[test]
    fn request_collects_repeated_data() {
        let cli = Cli::parse_from([
            "gantry", "request", "-X", "POST", "/category/create", "-d", "name=Toys", "-d",
            "x=1", "--json",
        ]);
        let Commands::Request(args) = cli.command else {
            panic!("expected Request command");
        };
        assert_eq!(args.method, "POST");
        assert_eq!(args.data, ["name=Toys", "x=1"]);
        assert!(args.json);
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::parse_from(["gantry", "serve"]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected Serve command");
        };
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 8080);
    }

    #[test]
    fn env_file_defaults_to_dotenv() {
        let cli = Cli::parse_from(["gantry", "routes"]);
        assert_eq!(cli.global.env_file, std::path::PathBuf::from(".env"));

        let cli = Cli::parse_from(["gantry", "routes", "--env-file", "prod.env"]);
        assert_eq!(cli.global.env_file, std::path::PathBuf::from("prod.env"));
    }

    #[test]
    fn config_show_flags() {
        let cli = Cli::parse_from(["gantry", "config", "show", "--console", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Show {
                console: true,
                format: DumpFormat::Json
            })
        ));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["gantry", "--quiet", "--verbose", "routes"]);
        assert!(result.is_err());
    }
}
