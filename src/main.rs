use anyhow::Result;
use brochure::Locale;
use brochure_contact::FormFields;
use clap::{Parser, Subcommand};

/// brochure - contact form for the marketing site
#[derive(Parser)]
#[command(name = "brochure")]
#[command(about = "Send messages through the site's contact form", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message
    Submit {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        message: String,

        /// Language of the printed status (overrides config file)
        #[arg(long)]
        locale: Option<Locale>,
    },
    /// Read messages from stdin, one form session until EOF
    Interactive {
        /// Language of prompts and status (overrides config file)
        #[arg(long)]
        locale: Option<Locale>,
    },
    /// Validate configuration and print the resolved settings
    CheckConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = brochure::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    brochure::observability::init_observability(
        "brochure",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
        config.observability.json,
    )?;

    let default_locale = config.site.locale;

    match cli.command {
        Commands::Submit {
            name,
            email,
            message,
            locale,
        } => {
            brochure::cli::submit(
                config,
                FormFields::new(name, email, message),
                locale.unwrap_or(default_locale),
            )
            .await
        }
        Commands::Interactive { locale } => {
            brochure::cli::interactive(config, locale.unwrap_or(default_locale)).await
        }
        Commands::CheckConfig => brochure::cli::check_config(config).await,
    }
}
