use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod context;
mod format;
mod logging;

/// drui - Docker Registry UI
///
/// Browse the repositories, tags and manifests of a container registry and
/// delete tags.
#[derive(Parser, Debug)]
#[command(name = "drui")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/drui/config.yaml)
    #[arg(short, long, global = true, env = "DRUI_CONFIG")]
    config: Option<PathBuf>,

    /// Registry endpoint, overrides registry.endpoint
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in seconds, overrides network.timeout
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Username for the registry
    #[arg(short, long, global = true, env = "DRUI_USERNAME")]
    username: Option<String>,

    /// Password for the registry (prompted when only a username is given)
    #[arg(short, long, global = true, env = "DRUI_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Output format: pretty, json, yaml
    #[arg(short, long, global = true, default_value = "pretty")]
    format: String,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display version information
    Version,
    /// Check credentials against the registry
    Login,
    /// List repositories
    #[command(visible_alias = "ls")]
    Repos {
        /// Only repositories starting with this prefix
        prefix: Option<String>,
    },
    /// List the tags of an image
    Tags {
        /// Image name (repository)
        image: String,
    },
    /// Show an image tag
    Show {
        /// Image name (repository)
        image: String,
        /// Tag (default: "latest" if present, else the highest version)
        tag: Option<String>,
        /// Resolve this manifest digest instead of the tag's
        #[arg(long)]
        digest: Option<String>,
    },
    /// Delete the manifest a tag points at
    #[command(visible_alias = "rm")]
    Delete {
        /// Image name (repository)
        image: String,
        /// Tag to delete
        tag: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            commands::version::print_version();
            return;
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            return;
        }
        _ => {}
    }

    let color = format::ColorChoice::from(cli.color.as_str());
    let verbosity = context::VerbosityLevel::from_count(cli.verbose);
    let output_format = format::OutputFormat::from(cli.format.as_str());

    let username = match (&cli.command, cli.username) {
        (Commands::Login, None) => commands::prompt_username().map(Some),
        (_, username) => Ok(username),
    };
    let credentials = username.and_then(|username| match username {
        Some(username) => commands::prompt_password(cli.password).map(|p| (Some(username), Some(p))),
        None => Ok((None, None)),
    });
    let (username, password) = match credentials {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let overrides = context::CliOverrides {
        endpoint: cli.endpoint,
        timeout: cli.timeout,
        username,
        password,
    };

    // Build context with precedence: defaults > config file > env vars > CLI flags
    let ctx = match context::AppContext::build(
        cli.config.as_deref(),
        overrides,
        color,
        verbosity,
        output_format,
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("✗ {}", commands::describe_error(&e));
            std::process::exit(1);
        }
    };
    logging::init(&ctx);
    tracing::debug!(
        endpoint = ?ctx.config.registry.endpoint,
        timeout = ctx.config.network.timeout,
        disable_delete = ctx.config.disable_delete,
        "configuration resolved"
    );

    let result = match cli.command {
        Commands::Login => commands::login::run(&ctx).await.map(|message| {
            format::success(&ctx, &message);
        }),
        Commands::Repos { prefix } => commands::repos::run(&ctx, prefix.as_deref())
            .await
            .map(|output| println!("{}", output)),
        Commands::Tags { image } => commands::tags::run(&ctx, &image)
            .await
            .map(|output| println!("{}", output)),
        Commands::Show { image, tag, digest } => {
            commands::show::run(&ctx, &image, tag.as_deref(), digest.as_deref())
                .await
                .map(|output| println!("{}", output))
        }
        Commands::Delete { image, tag, force } => {
            let mut stdin = std::io::stdin().lock();
            commands::delete::run(&ctx, &image, &tag, force, &mut stdin)
                .await
                .map(|message| format::success(&ctx, &message))
        }
        Commands::Version | Commands::Completion { .. } => Ok(()),
    };

    if let Err(e) = result {
        format::error(&ctx, &e);
        std::process::exit(1);
    }
}
