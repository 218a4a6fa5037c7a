use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use storefront_ui::{script::PageReport, Config, MemoryDocument, Page};

/// Load a page and report its dialogs
#[derive(Args)]
pub struct InspectCommand {
    /// HTML page to load
    pub page: PathBuf,

    /// Print the wired page as HTML after the report
    #[arg(long)]
    pub dump: bool,
}

impl InspectCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let document = MemoryDocument::load(&self.page).await?;
        let page = Page::load(document, config.page_options());
        info!(
            "Loaded {} with {} dialog(s)",
            self.page.display(),
            page.modals().initialized_count()
        );

        let report = PageReport::capture(&page);
        println!("{}", serde_json::to_string_pretty(&report)?);

        if self.dump {
            println!("{}", page.document().to_html());
        }
        Ok(())
    }
}
