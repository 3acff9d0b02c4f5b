mod commands;

use clap::{Parser, Subcommand};
use prospect_core::config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prospect",
    version,
    about = "Prospect HUB — WhatsApp prospecting from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Import phone numbers from a spreadsheet, CSV or TXT file.
    Import {
        /// File to import (.xlsx, .xls, .csv or .txt).
        file: PathBuf,
    },
    /// Add one phone number to the active list.
    Add {
        /// The number, in any format; it is canonicalized on entry.
        number: String,
    },
    /// Remove one phone number from the active list.
    Remove {
        /// The number as it shows in `list`.
        number: String,
    },
    /// Show the active phone list.
    List,
    /// Empty the active phone list.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Open a WhatsApp chat link for every number on the list.
    Send {
        /// Message text.
        #[arg(short, long)]
        message: Option<String>,
        /// Read the message from a file instead.
        #[arg(long, conflicts_with = "message")]
        message_file: Option<PathBuf>,
        /// Present links one by one instead of auto-opening them.
        #[arg(long)]
        manual: bool,
        /// Also forward each number to RD Station.
        #[arg(long)]
        crm: bool,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or clear the send history.
    History {
        /// How many records to show.
        #[arg(long, default_value_t = 50)]
        limit: i64,
        /// Delete the whole history instead of showing it.
        #[arg(long)]
        clear: bool,
    },
    /// RD Station CRM integration.
    Crm {
        #[command(subcommand)]
        command: CrmCommands,
    },
    /// Move notes and files between devices.
    Transfer {
        #[command(subcommand)]
        command: TransferCommands,
    },
    /// Switch the display theme.
    Theme {
        /// `light` or `dark`.
        theme: String,
    },
    /// Show configuration and integration status.
    Status,
}

#[derive(Subcommand)]
enum CrmCommands {
    /// Show integration status.
    Status,
    /// Store the API token (a non-empty token also enables the integration).
    Token { token: String },
    /// Turn the integration on.
    Enable,
    /// Turn the integration off.
    Disable,
    /// Send one contact to the CRM.
    Send {
        /// Contact phone, in any format.
        phone: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        cnpj: Option<String>,
        /// May be given more than once.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum TransferCommands {
    /// Upload a text note.
    Note {
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Upload a file.
    File { path: PathBuf },
    /// List this device's transfers.
    List,
    /// Delete a transfer record.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cfg.app.log_level.clone())),
        )
        .init();

    let ctx = commands::AppContext::init(cfg).await?;

    match cli.command {
        Commands::Import { file } => commands::import::run_import(&ctx, &file).await,
        Commands::Add { number } => commands::import::run_add(&ctx, &number).await,
        Commands::Remove { number } => commands::import::run_remove(&ctx, &number).await,
        Commands::List => commands::import::run_list(&ctx).await,
        Commands::Clear { yes } => commands::import::run_clear(&ctx, yes).await,
        Commands::Send {
            message,
            message_file,
            manual,
            crm,
            yes,
        } => {
            commands::send::run(
                &ctx,
                commands::send::SendArgs {
                    message,
                    message_file,
                    manual,
                    crm,
                    yes,
                },
            )
            .await
        }
        Commands::History { limit, clear } => commands::history::run(&ctx, limit, clear).await,
        Commands::Crm { command } => match command {
            CrmCommands::Status => commands::crm::run_status(&ctx).await,
            CrmCommands::Token { token } => commands::crm::run_token(&ctx, &token).await,
            CrmCommands::Enable => commands::crm::run_set_enabled(&ctx, true).await,
            CrmCommands::Disable => commands::crm::run_set_enabled(&ctx, false).await,
            CrmCommands::Send {
                phone,
                name,
                email,
                company,
                cnpj,
                tags,
                notes,
            } => {
                commands::crm::run_send(
                    &ctx,
                    commands::crm::ContactArgs {
                        phone,
                        name,
                        email,
                        company,
                        cnpj,
                        tags,
                        notes,
                    },
                )
                .await
            }
        },
        Commands::Transfer { command } => match command {
            TransferCommands::Note { text } => {
                commands::transfer::run_note(&ctx, &text.join(" ")).await
            }
            TransferCommands::File { path } => commands::transfer::run_file(&ctx, &path).await,
            TransferCommands::List => commands::transfer::run_list(&ctx).await,
            TransferCommands::Delete { id } => commands::transfer::run_delete(&ctx, &id).await,
        },
        Commands::Theme { theme } => commands::run_theme(&ctx, &theme).await,
        Commands::Status => commands::status::run(&ctx).await,
    }
}
