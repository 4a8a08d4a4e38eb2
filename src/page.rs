use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::page::Page as CrPage;
use chromiumoxide::page::ScreenshotParams;
use futures::stream::{self, Stream, StreamExt};
use log::debug;

use crate::capture::ImageFormat;
use crate::error::{Error, Result};

/// Wrapper around a chromiumoxide Page with a render-oriented API:
/// navigate until network idle, extract HTML, capture a full-page screenshot.
pub struct Page {
    inner: CrPage,
    navigation_timeout: Duration,
    idle_window: Duration,
}

impl Page {
    pub(crate) fn new(inner: CrPage, navigation_timeout: Duration, idle_window: Duration) -> Self {
        Self {
            inner,
            navigation_timeout,
            idle_window,
        }
    }

    /// Returns a reference to the underlying chromiumoxide Page.
    pub fn inner(&self) -> &CrPage {
        &self.inner
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Navigate to the given URL and wait until the network has been idle
    /// for the configured quiescence window.
    ///
    /// The whole sequence is bounded by the configured navigation timeout;
    /// pages that never go quiet (long-polling, streaming) fail with
    /// [`Error::Timeout`].
    pub async fn goto(&self, url: &str) -> Result<()> {
        tokio::time::timeout(self.navigation_timeout, self.navigate_and_settle(url))
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "network idle on {url} (after {:?})",
                    self.navigation_timeout
                ))
            })?
    }

    async fn navigate_and_settle(&self, url: &str) -> Result<()> {
        // Subscribe before enabling the Network domain so the document
        // request itself is counted.
        let started = self.inner.event_listener::<EventRequestWillBeSent>().await?;
        let finished = self.inner.event_listener::<EventLoadingFinished>().await?;
        let failed = self.inner.event_listener::<EventLoadingFailed>().await?;

        self.inner.execute(EnableParams::builder().build()).await?;

        self.inner
            .goto(url)
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?
            .wait_for_navigation()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;

        // The three listeners buffer independently while navigation runs, so
        // cross-stream arrival order is not trustworthy by the time they are
        // drained here. Idle detection pairs events by request id instead.
        let events = stream::select(
            started.map(|e| NetworkEvent::Started(e.request_id.clone())),
            stream::select(
                finished.map(|e| NetworkEvent::Finished(e.request_id.clone())),
                failed.map(|e| NetworkEvent::Finished(e.request_id.clone())),
            ),
        );
        await_network_idle(events, self.idle_window).await;

        debug!("network idle: {url}");
        Ok(())
    }

    /// Get the current page URL.
    pub async fn url(&self) -> Result<String> {
        self.inner
            .url()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?
            .ok_or_else(|| Error::NavigationError("No URL found".into()))
    }

    /// Get the current page title.
    pub async fn title(&self) -> Result<String> {
        let result = self
            .inner
            .evaluate("document.title")
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        match result.into_value::<String>() {
            Ok(title) => Ok(title),
            Err(_) => Ok(String::new()),
        }
    }

    // ── Extraction ──────────────────────────────────────────────────

    /// Get the full HTML serialization of the page in its current state.
    pub async fn html(&self) -> Result<String> {
        Ok(self.inner.content().await?)
    }

    /// Take a full-page screenshot in the given format.
    pub async fn screenshot(&self, format: ImageFormat) -> Result<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(format.to_cdp())
            .full_page(true)
            .build();
        self.inner
            .screenshot(params)
            .await
            .map_err(|e| Error::ScreenshotError(e.to_string()))
    }

    /// Take a full-page screenshot and save it to a file, inferring the
    /// format from the path's extension (unrecognized extensions fall back
    /// to PNG). Returns the format that was used.
    pub async fn save_screenshot(&self, path: impl AsRef<Path>) -> Result<ImageFormat> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path);
        debug!("capturing {} screenshot to {}", format, path.display());
        let params = ScreenshotParams::builder()
            .format(format.to_cdp())
            .full_page(true)
            .build();
        self.inner
            .save_screenshot(params, path)
            .await
            .map_err(|e| Error::ScreenshotError(e.to_string()))?;
        Ok(format)
    }
}

/// A network request lifecycle edge, reduced to what idle detection needs.
/// Failed loads count as finished.
#[derive(Debug)]
enum NetworkEvent<I> {
    Started(I),
    Finished(I),
}

/// Resolve once no requests have been in flight for a full `idle_window`
/// (or the event stream ends).
///
/// A completion can arrive before its matching start, since the underlying
/// listeners are drained after the fact. An unmatched completion is
/// remembered and cancels the start when it shows up, so a page that is
/// already quiet cannot get stuck behind a phantom in-flight request.
async fn await_network_idle<I, S>(mut events: S, idle_window: Duration)
where
    I: Eq + Hash,
    S: Stream<Item = NetworkEvent<I>> + Unpin,
{
    let mut inflight: HashSet<I> = HashSet::new();
    let mut finished_early: HashSet<I> = HashSet::new();

    loop {
        let idle = tokio::time::sleep(idle_window);
        tokio::select! {
            Some(event) = events.next() => match event {
                NetworkEvent::Started(id) => {
                    // A redirect re-sends the same id; still one request
                    if !finished_early.remove(&id) {
                        inflight.insert(id);
                    }
                }
                NetworkEvent::Finished(id) => {
                    if !inflight.remove(&id) {
                        finished_early.insert(id);
                    }
                }
            },
            _ = idle, if inflight.is_empty() => break,
            else => break,
        }
    }
}
