use std::time::Duration;

use chromiumoxide::browser::{Browser as CrBrowser, BrowserConfig as CrBrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use log::{debug, warn};

use crate::config::{RendererBuilder, RendererConfig};
use crate::error::{Error, Result};
use crate::page::Page;

/// Chrome flags that keep headless rendering stable in containers and CI
/// without affecting page content.
const STABILITY_ARGS: &[&str] = &[
    "disable-gpu",
    "disable-dev-shm-usage",
    "disable-setuid-sandbox",
    "disable-extensions",
    "disable-popup-blocking",
    "disable-prompt-on-repost",
    "no-default-browser-check",
    "metrics-recording-only",
    "mute-audio",
];

/// An exclusively-owned headless Chromium instance.
///
/// Launched once per invocation and released via [`Renderer::close`]; callers
/// are expected to close it on every exit path, including after a failed
/// navigation.
pub struct Renderer {
    browser: CrBrowser,
    user_agent: Option<String>,
    navigation_timeout: Duration,
    idle_window: Duration,
    handler_task: tokio::task::JoinHandle<()>,
}

impl Renderer {
    /// Create a new RendererBuilder for configuring and launching a browser.
    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    /// Launch a browser instance with the given configuration.
    pub async fn launch(config: RendererConfig) -> Result<Self> {
        let mut builder = CrBrowserConfig::builder();

        if config.headless {
            builder = builder.new_headless_mode().no_sandbox();
        } else {
            builder = builder.with_head().no_sandbox();
        }

        // chromiumoxide adds the `--` prefix itself, so keys must not carry it
        for arg in STABILITY_ARGS {
            builder = builder.arg(*arg);
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder = builder.viewport(Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        });

        let cr_config = builder
            .build()
            .map_err(|e| Error::LaunchError(e.to_string()))?;

        let (browser, mut handler) = CrBrowser::launch(cr_config)
            .await
            .map_err(|e| Error::LaunchError(e.to_string()))?;

        debug!("browser launched ({}x{})", config.viewport_width, config.viewport_height);

        // Drive the CDP message loop until the browser goes away. Some CDP
        // events fail to decode on older protocol revisions; that noise is
        // harmless and is kept out of the logs.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let msg = e.to_string();
                    if !msg.contains("data did not match any variant of untagged enum Message") {
                        warn!("browser handler: {msg}");
                    }
                }
            }
        });

        Ok(Self {
            browser,
            user_agent: config.user_agent,
            navigation_timeout: config.navigation_timeout,
            idle_window: config.idle_window,
            handler_task,
        })
    }

    /// Open a new blank page (tab).
    /// If a user-agent override is configured, it is applied before the
    /// caller gets a chance to navigate.
    pub async fn new_page(&self) -> Result<Page> {
        let cr_page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;

        if let Some(ref user_agent) = self.user_agent {
            debug!("applying user-agent override: {user_agent}");
            let params = SetUserAgentOverrideParams::builder()
                .user_agent(user_agent)
                .accept_language("en-US,en;q=0.9")
                .build()
                .map_err(|e| Error::LaunchError(format!("Invalid user-agent override: {e}")))?;
            cr_page.execute(params).await?;
        }

        Ok(Page::new(cr_page, self.navigation_timeout, self.idle_window))
    }

    /// Shut the browser down and wait for its message loop to drain.
    ///
    /// Consumes the renderer so the instance cannot be used (or closed) twice.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        let _ = self.handler_task.await;
        debug!("browser closed");
        Ok(())
    }
}
