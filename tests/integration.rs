//! Browser-level tests. These need a local Chrome/Chromium and network
//! access, so they are ignored by default:
//!
//!   cargo test -- --ignored

use pagesnap::{ImageFormat, Renderer};

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn render_and_extract_html() {
    let renderer = Renderer::builder()
        .build()
        .await
        .expect("Failed to launch browser");

    let page = renderer.new_page().await.expect("Failed to open page");
    page.goto("https://example.com")
        .await
        .expect("Failed to navigate");

    let title = page.title().await.expect("Failed to get title");
    assert!(title.contains("Example"), "Title was: {title}");

    let html = page.html().await.expect("Failed to get HTML");
    assert!(html.contains("Example Domain"));

    renderer.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn full_page_screenshot_png() {
    let renderer = Renderer::builder()
        .build()
        .await
        .expect("Failed to launch browser");

    let page = renderer.new_page().await.expect("Failed to open page");
    page.goto("https://example.com")
        .await
        .expect("Failed to navigate");

    let png = page
        .screenshot(ImageFormat::Png)
        .await
        .expect("Failed to take screenshot");
    assert_eq!(&png[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    assert!(png.len() > 1000, "Screenshot too small: {} bytes", png.len());

    renderer.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn full_page_screenshot_jpeg() {
    let renderer = Renderer::builder()
        .build()
        .await
        .expect("Failed to launch browser");

    let page = renderer.new_page().await.expect("Failed to open page");
    page.goto("https://example.com")
        .await
        .expect("Failed to navigate");

    let jpeg = page
        .screenshot(ImageFormat::Jpeg)
        .await
        .expect("Failed to take JPEG screenshot");
    // JPEG magic bytes: FF D8 FF
    assert_eq!(&jpeg[0..3], &[0xFF, 0xD8, 0xFF]);

    renderer.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn save_screenshot_infers_webp_from_extension() {
    let renderer = Renderer::builder()
        .build()
        .await
        .expect("Failed to launch browser");

    let page = renderer.new_page().await.expect("Failed to open page");
    page.goto("https://example.com")
        .await
        .expect("Failed to navigate");

    let path = std::env::temp_dir().join(format!("pagesnap-test-{}.webp", std::process::id()));
    let format = page
        .save_screenshot(&path)
        .await
        .expect("Failed to save screenshot");
    assert_eq!(format, ImageFormat::Webp);

    let bytes = std::fs::read(&path).expect("Screenshot file missing");
    // WEBP container: "RIFF" .... "WEBP"
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WEBP");

    let _ = std::fs::remove_file(&path);
    renderer.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn unreachable_host_fails_but_browser_still_closes() {
    let renderer = Renderer::builder()
        .navigation_timeout(std::time::Duration::from_secs(10))
        .build()
        .await
        .expect("Failed to launch browser");

    let page = renderer.new_page().await.expect("Failed to open page");
    let result = page.goto("http://nonexistent.invalid/").await;
    assert!(result.is_err(), "Expected navigation to fail");

    // Release must still work after a failed navigation
    renderer.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn user_agent_override_is_visible_to_the_page() {
    let renderer = Renderer::builder()
        .user_agent("pagesnap-integration/1.0")
        .build()
        .await
        .expect("Failed to launch browser");

    let page = renderer.new_page().await.expect("Failed to open page");
    page.goto("https://example.com")
        .await
        .expect("Failed to navigate");

    let ua = page
        .inner()
        .evaluate("navigator.userAgent")
        .await
        .expect("Failed to evaluate")
        .into_value::<String>()
        .expect("userAgent was not a string");
    assert_eq!(ua, "pagesnap-integration/1.0");

    renderer.close().await.expect("Failed to close browser");
}
