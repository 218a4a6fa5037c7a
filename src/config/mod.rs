use crate::error::{UiError, UiResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Page behaviour configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Viewport width at or below which navigation collapses
    pub breakpoint_px: u32,

    /// Delay before flash messages start fading
    pub flash_delay_ms: u64,

    /// Fade duration before a flash message is removed
    pub flash_fade_ms: u64,

    /// How long the "Added!" label stays on a cart button
    pub cart_feedback_ms: u64,

    /// Initial viewport size
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Timeout for the request helper
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            breakpoint_px: 768,
            flash_delay_ms: 5000,
            flash_fade_ms: 500,
            cart_feedback_ms: 2000,
            viewport_width: 1280,
            viewport_height: 800,
            request_timeout_secs: 30,
        }
    }
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Settings a page needs at runtime, resolved from [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub breakpoint_px: u32,
    pub flash_delay: Duration,
    pub flash_fade: Duration,
    pub cart_feedback: Duration,
    pub viewport: Viewport,
}

impl Default for PageOptions {
    fn default() -> Self {
        Config::default().page_options()
    }
}

impl Config {
    /// Initialize configuration from defaults, the first config file found and
    /// `STOREFRONT_*` overrides read through `lookup`
    pub async fn init(lookup: impl Fn(&str) -> Option<String>) -> UiResult<Self> {
        debug!("Initializing configuration");

        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path).await?,
            None => Self::default(),
        };

        config.apply_overrides(lookup);
        Ok(config)
    }

    /// First existing config file, in priority order
    pub fn find_config_file() -> Option<PathBuf> {
        Self::find_config_file_in(Path::new("."), dirs::config_dir())
    }

    fn find_config_file_in(cwd: &Path, config_dir: Option<PathBuf>) -> Option<PathBuf> {
        let mut candidates = vec![cwd.join(".storefront.json"), cwd.join("storefront.json")];

        if let Some(config_dir) = config_dir {
            candidates.push(config_dir.join("storefront-ui").join("storefront.json"));
        }

        candidates.into_iter().find(|path| path.exists())
    }

    /// Load configuration from a JSON file; missing keys keep their defaults
    pub async fn load_from_file(path: &Path) -> UiResult<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Apply `STOREFRONT_*` overrides, reading each variable through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parse<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
            raw.and_then(|value| value.trim().parse().ok())
        }

        if let Some(value) = parse(lookup("STOREFRONT_BREAKPOINT_PX")) {
            self.breakpoint_px = value;
        }
        if let Some(value) = parse(lookup("STOREFRONT_FLASH_DELAY_MS")) {
            self.flash_delay_ms = value;
        }
        if let Some(value) = parse(lookup("STOREFRONT_FLASH_FADE_MS")) {
            self.flash_fade_ms = value;
        }
        if let Some(value) = parse(lookup("STOREFRONT_CART_FEEDBACK_MS")) {
            self.cart_feedback_ms = value;
        }
        if let Some(value) = parse(lookup("STOREFRONT_VIEWPORT_WIDTH")) {
            self.viewport_width = value;
        }
        if let Some(value) = parse(lookup("STOREFRONT_VIEWPORT_HEIGHT")) {
            self.viewport_height = value;
        }
        if let Some(value) = parse(lookup("STOREFRONT_REQUEST_TIMEOUT_SECS")) {
            self.request_timeout_secs = value;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> UiResult<()> {
        if self.breakpoint_px == 0 {
            return Err(UiError::ConfigError(
                "breakpoint_px must be greater than 0".to_string(),
            ));
        }

        if self.viewport_width == 0 {
            return Err(UiError::ConfigError(
                "viewport_width must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(UiError::ConfigError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            breakpoint_px: self.breakpoint_px,
            flash_delay: Duration::from_millis(self.flash_delay_ms),
            flash_fade: Duration::from_millis(self.flash_fade_ms),
            cart_feedback: Duration::from_millis(self.cart_feedback_ms),
            viewport: Viewport {
                width: self.viewport_width,
                height: self.viewport_height,
            },
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
