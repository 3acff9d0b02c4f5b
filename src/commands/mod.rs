//! CLI command handlers.

pub mod crm;
pub mod history;
pub mod import;
pub mod send;
pub mod status;
pub mod transfer;

use anyhow::bail;
use console::Style;
use prospect_core::config::Config;
use prospect_store::{Settings, Store};

/// Everything a command handler needs, initialized once per invocation.
pub struct AppContext {
    pub cfg: Config,
    pub store: Store,
    pub settings: Settings,
}

impl AppContext {
    pub async fn init(cfg: Config) -> anyhow::Result<Self> {
        let store = Store::new(&cfg.store).await?;
        let settings = Settings::load(&store).await?;
        Ok(Self {
            cfg,
            store,
            settings,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.cfg.app.user_id
    }

    /// Accent style for headings, following the theme setting.
    pub fn accent(&self) -> Style {
        if self.settings.theme == "dark" {
            Style::new().cyan().bold()
        } else {
            Style::new().red().bold()
        }
    }

    /// Dim style for secondary detail.
    pub fn dim(&self) -> Style {
        Style::new().dim()
    }
}

/// `prospect theme <light|dark>`
pub async fn run_theme(ctx: &AppContext, theme: &str) -> anyhow::Result<()> {
    match theme {
        "light" | "dark" => {
            ctx.store.set_theme(theme).await?;
            println!("Theme set to {theme}.");
            Ok(())
        }
        other => bail!("unknown theme '{other}': use light or dark"),
    }
}
