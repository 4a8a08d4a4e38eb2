use std::path::PathBuf;
use std::time::Duration;

use crate::browser::Renderer;
use crate::error::Result;

pub struct RendererConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub chrome_path: Option<PathBuf>,
    /// User-agent override applied to every page before navigation.
    pub user_agent: Option<String>,
    /// Upper bound on navigate-and-settle, including the network-idle wait
    /// (default: 30s).
    pub navigation_timeout: Duration,
    /// How long the network must stay quiet before a page counts as idle
    /// (default: 500ms).
    pub idle_window: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chrome_path: None,
            user_agent: None,
            navigation_timeout: Duration::from_secs(30),
            idle_window: Duration::from_millis(500),
        }
    }
}

pub struct RendererBuilder {
    config: RendererConfig,
}

impl RendererBuilder {
    pub fn new() -> Self {
        Self {
            config: RendererConfig::default(),
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Set the upper bound on navigation, including the network-idle wait.
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.navigation_timeout = timeout;
        self
    }

    /// Set the quiescence window for network-idle detection.
    pub fn idle_window(mut self, window: Duration) -> Self {
        self.config.idle_window = window;
        self
    }

    pub fn build_config(self) -> RendererConfig {
        self.config
    }

    pub async fn build(self) -> Result<Renderer> {
        Renderer::launch(self.build_config()).await
    }
}

impl Default for RendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}
