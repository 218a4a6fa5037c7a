use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use storefront_ui::{
    script::{PageReport, Script, StepResult},
    Config, MemoryDocument, Page,
};

/// Replay a YAML script of interactions against a page
#[derive(Args)]
pub struct SimulateCommand {
    /// HTML page to load
    pub page: PathBuf,

    /// YAML script to replay
    pub script: PathBuf,

    /// Print the final page as HTML after the report
    #[arg(long)]
    pub dump: bool,
}

#[derive(Serialize)]
struct SimulationOutput {
    steps: Vec<StepResult>,
    report: PageReport,
}

impl SimulateCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let (output, page) = self.simulate(config).await?;
        println!("{}", serde_json::to_string_pretty(&output)?);

        if self.dump {
            println!("{}", page.document().to_html());
        }
        Ok(())
    }

    async fn simulate(&self, config: &Config) -> Result<(SimulationOutput, Page<MemoryDocument>)> {
        let document = MemoryDocument::load(&self.page)
            .await
            .with_context(|| format!("Failed to load page {}", self.page.display()))?;
        let source = tokio::fs::read_to_string(&self.script)
            .await
            .with_context(|| format!("Failed to read script {}", self.script.display()))?;
        let script = Script::from_yaml(&source)?;

        let mut page = Page::load(document, config.page_options());
        let steps = script.run(&mut page)?;
        info!("Replayed {} step(s)", steps.len());

        let output = SimulationOutput {
            steps,
            report: PageReport::capture(&page),
        };
        Ok((output, page))
    }
}
