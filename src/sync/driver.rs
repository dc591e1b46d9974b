//! Synchronization driver.
//!
//! Items are processed strictly serially. Each item moves Pending ->
//! Synced only after its artifact is fully fetched and, for albums,
//! fully extracted; the downloaded set is flushed to disk before the
//! next item starts, so a crash mid-run loses at most the in-flight
//! item.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use rand::Rng;
use tokio::time::sleep;

use crate::api::BandcampApi;
use crate::config::Settings;
use crate::download::{fetch_item_file, maybe_extract};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, sanitize_title};
use crate::scrape::{PageData, PageDataScanner};
use crate::sync::item::{join_collection, CollectionItem};
use crate::sync::state::SyncReport;

/// Driver behavior switches derived from CLI flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Abort the whole run on the first failed item.
    pub fail_fast: bool,

    /// Show per-file download progress.
    pub show_progress: bool,
}

/// Synchronize the whole collection.
///
/// Collection-level failures (summary, search, join) abort the run;
/// per-item failures are recorded and the run continues unless
/// `fail_fast` is set.
pub async fn sync_collection(
    api: &BandcampApi,
    settings: &mut Settings,
    settings_path: &Path,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let fan_id = api.collection_summary().await?;
    tracing::debug!("Fan id: {}", fan_id);

    let collection = api.search_collection(fan_id).await?;
    tracing::info!(
        "Collection lists {} purchased item(s)",
        collection.tralbums.len()
    );

    let joined = join_collection(&collection)?;

    let mut report = SyncReport::default();
    for key in joined.unmatched {
        report.record_failed(key);
    }

    ensure_dir(&settings.music_path)?;

    for item in &joined.items {
        let item_key = item.item_key();

        if settings.is_downloaded(&item_key) {
            tracing::debug!("Skipping already synced {}", item_key);
            report.record_skipped();
            continue;
        }

        // Politeness delay before each fetch; skipped items touch nothing.
        let delay_ms = rand::thread_rng().gen_range(400..750);
        sleep(Duration::from_millis(delay_ms)).await;

        match sync_item(api, settings, item, options).await {
            Ok(()) => {
                settings.mark_downloaded(item_key);
                settings.save(settings_path)?;
                report.record_downloaded();
            }
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => {
                tracing::error!("Failed to sync {}: {}", item_key, e);
                report.record_failed(item_key);
            }
        }
    }

    Ok(report)
}

/// Fetch and unpack a single pending item.
async fn sync_item(
    api: &BandcampApi,
    settings: &Settings,
    item: &CollectionItem,
    options: &SyncOptions,
) -> Result<()> {
    let redownload_url = url::Url::parse(&item.redownload_url)?;
    let page = scrape_download_page(api, redownload_url.as_str()).await?;

    let digital = page.digital_items.first().ok_or_else(|| {
        Error::Api(format!(
            "Download page for {} lists no digital items",
            item.item_key()
        ))
    })?;

    let format_key = settings.format.as_str();
    let link = digital.downloads.get(format_key).ok_or_else(|| {
        Error::Api(format!(
            "No {} download offered for '{}'",
            format_key, digital.title
        ))
    })?;

    tracing::info!("Downloading '{}' ({})", digital.title, item.kind);
    tracing::debug!("Resolved link: {}", link.url);

    let title = sanitize_title(&digital.title)?;
    let file = fetch_item_file(
        api,
        settings,
        &link.url,
        &title,
        item.kind,
        options.show_progress,
    )
    .await?;

    if let Some(dest) = maybe_extract(&file, &settings.music_path, &title)? {
        tracing::info!("Extracted album to {}", dest.display());
    }

    Ok(())
}

/// Fetch a redownload page and extract its embedded data.
///
/// The body is fed to the scanner chunk-by-chunk; on the first match the
/// remaining stream is dropped without being read.
async fn scrape_download_page(api: &BandcampApi, url: &str) -> Result<PageData> {
    let response = api.fetch_page(url).await?;
    let mut scanner = PageDataScanner::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        if let Some(page) = scanner.feed(&chunk)? {
            return Ok(page);
        }
    }

    Err(Error::PageDataNotFound(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SUMMARY_BODY: &str = r#"{"collection_summary":{"fan_id":42}}"#;

    fn page_body(title: &str, format: &str, url: &str) -> String {
        format!(
            "<html><body><div id=\"pagedata\" data-blob='{{\"digital_items\":[{{\"title\":\"{}\",\"downloads\":{{\"{}\":{{\"url\":\"{}\"}}}}}}]}}'></div></body></html>",
            title, format, url
        )
    }

    async fn mount_summary(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/fan/2/collection_summary"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SUMMARY_BODY))
            .mount(server)
            .await;
    }

    async fn mount_search(server: &MockServer, body: String) {
        Mock::given(method("POST"))
            .and(path("/fancollection/1/search_items"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn test_settings(dir: &Path) -> Settings {
        Settings {
            identity: "token".into(),
            music_path: dir.join("music"),
            format: "flac".parse().unwrap(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_track_sync_records_key_and_writes_file() {
        let server = MockServer::start().await;
        mount_summary(&server).await;
        mount_search(
            &server,
            format!(
                r#"{{"tralbums":[{{"item_id":7,"tralbum_type":"t","sale_item_type":"p","sale_item_id":11}}],
                    "redownload_urls":{{"p11":"{}/download/p11"}}}}"#,
                server.uri()
            ),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/download/p11"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_body(
                "Night Drive",
                "flac",
                &format!("{}/file/p11", server.uri()),
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/file/p11"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"flac-bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        let mut settings = test_settings(dir.path());
        let api = BandcampApi::with_base_url("token".into(), server.uri()).unwrap();

        let report = sync_collection(&api, &mut settings, &settings_path, &SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(report.downloaded, 1);
        assert_eq!(report.skipped, 0);
        assert!(!report.has_failures());
        assert!(settings.is_downloaded("track7"));

        // Durable state on disk reflects the new key.
        let persisted = Settings::load(&settings_path).unwrap();
        assert!(persisted.is_downloaded("track7"));

        let artifact = settings.music_path.join("Night Drive.flac");
        assert_eq!(std::fs::read(artifact).unwrap(), b"flac-bytes");
    }

    #[tokio::test]
    async fn test_album_sync_extracts_bundle() {
        let server = MockServer::start().await;
        mount_summary(&server).await;
        mount_search(
            &server,
            format!(
                r#"{{"tralbums":[{{"item_id":42,"tralbum_type":"a","sale_item_type":"p","sale_item_id":900}}],
                    "redownload_urls":{{"p900":"{}/download/p900"}}}}"#,
                server.uri()
            ),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/download/p900"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_body(
                "Some Album",
                "flac",
                &format!("{}/file/p900", server.uri()),
            )))
            .mount(&server)
            .await;

        let mut zip_bytes = Vec::new();
        {
            use std::io::Write;
            let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut zip_bytes));
            writer
                .start_file("01 - One.flac", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"one").unwrap();
            writer
                .start_file("02 - Two.flac", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"two").unwrap();
            writer.finish().unwrap();
        }
        Mock::given(method("GET"))
            .and(path("/file/p900"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(zip_bytes))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        let mut settings = test_settings(dir.path());
        let api = BandcampApi::with_base_url("token".into(), server.uri()).unwrap();

        let report = sync_collection(&api, &mut settings, &settings_path, &SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(report.downloaded, 1);
        assert!(settings.is_downloaded("album42"));

        let album_dir = settings.music_path.join("Some Album");
        assert_eq!(std::fs::read(album_dir.join("01 - One.flac")).unwrap(), b"one");
        assert_eq!(std::fs::read(album_dir.join("02 - Two.flac")).unwrap(), b"two");
        assert!(!settings.music_path.join("Some Album.zip").exists());
    }

    #[tokio::test]
    async fn test_synced_items_issue_no_item_requests() {
        let server = MockServer::start().await;
        mount_summary(&server).await;
        mount_search(
            &server,
            format!(
                r#"{{"tralbums":[{{"item_id":7,"tralbum_type":"t","sale_item_type":"p","sale_item_id":11}}],
                    "redownload_urls":{{"p11":"{}/download/p11"}}}}"#,
                server.uri()
            ),
        )
        .await;
        // The redownload page must never be requested for a synced item.
        Mock::given(method("GET"))
            .and(path("/download/p11"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        let mut settings = test_settings(dir.path());
        settings.mark_downloaded("track7".into());
        let api = BandcampApi::with_base_url("token".into(), server.uri()).unwrap();

        let report = sync_collection(&api, &mut settings, &settings_path, &SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.downloaded, 0);
        assert_eq!(std::fs::read_dir(&settings.music_path).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_item_does_not_block_later_items() {
        let server = MockServer::start().await;
        mount_summary(&server).await;
        mount_search(
            &server,
            format!(
                r#"{{"tralbums":[
                        {{"item_id":1,"tralbum_type":"t","sale_item_type":"p","sale_item_id":10}},
                        {{"item_id":2,"tralbum_type":"t","sale_item_type":"p","sale_item_id":20}}],
                    "redownload_urls":{{"p10":"{0}/download/p10","p20":"{0}/download/p20"}}}}"#,
                server.uri()
            ),
        )
        .await;
        // First item: page has no pagedata element.
        Mock::given(method("GET"))
            .and(path("/download/p10"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/download/p20"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_body(
                "Second",
                "flac",
                &format!("{}/file/p20", server.uri()),
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/file/p20"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        let mut settings = test_settings(dir.path());
        let api = BandcampApi::with_base_url("token".into(), server.uri()).unwrap();

        let report = sync_collection(&api, &mut settings, &settings_path, &SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(report.downloaded, 1);
        assert_eq!(report.failed, vec!["track1".to_string()]);
        assert!(settings.is_downloaded("track2"));
        assert!(!settings.is_downloaded("track1"));

        // The flush happened per item: the failed key never reached disk.
        let persisted = Settings::load(&settings_path).unwrap();
        assert!(persisted.is_downloaded("track2"));
        assert!(!persisted.is_downloaded("track1"));
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_on_first_error() {
        let server = MockServer::start().await;
        mount_summary(&server).await;
        mount_search(
            &server,
            format!(
                r#"{{"tralbums":[{{"item_id":1,"tralbum_type":"t","sale_item_type":"p","sale_item_id":10}}],
                    "redownload_urls":{{"p10":"{}/download/p10"}}}}"#,
                server.uri()
            ),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/download/p10"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        let mut settings = test_settings(dir.path());
        let api = BandcampApi::with_base_url("token".into(), server.uri()).unwrap();

        let options = SyncOptions {
            fail_fast: true,
            ..Default::default()
        };
        let result = sync_collection(&api, &mut settings, &settings_path, &options).await;
        assert!(matches!(result, Err(Error::PageDataNotFound(_))));
    }
}
