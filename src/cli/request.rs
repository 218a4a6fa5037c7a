use anyhow::{anyhow, Result};
use clap::Args;
use reqwest::Method;
use tracing::info;

use storefront_ui::{
    request::{RequestOptions, Requester, ResponseBody},
    Config,
};

/// Send a request through the request helper
#[derive(Args)]
pub struct RequestCommand {
    /// Target URL
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// JSON payload
    #[arg(long)]
    pub data: Option<String>,
}

impl RequestCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let method = Method::from_bytes(self.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| anyhow!("Invalid HTTP method: {}", self.method))?;

        let mut options = RequestOptions::new()
            .with_method(method)
            .on_success(|body| match body {
                ResponseBody::Json(_) => info!("Request succeeded with a JSON body"),
                ResponseBody::Text(_) => info!("Request succeeded with a text body"),
            })
            .on_error(|status, text| info!("Request failed: {} {}", status, text));
        if let Some(data) = &self.data {
            options = options.with_data(serde_json::from_str(data)?);
        }

        let requester = Requester::new(config.request_timeout())?;
        let outcome = requester.send(&self.url, options).await;
        println!("{}", serde_json::to_string_pretty(&outcome)?);

        if !outcome.is_success() {
            return Err(anyhow!("Request to {} failed", self.url));
        }
        Ok(())
    }
}
