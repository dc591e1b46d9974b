//! Media file downloading.

use std::path::PathBuf;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::BandcampApi;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::fs::artifact_path;
use crate::output::create_download_bar;
use crate::sync::ItemKind;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Fetch a resolved download URL to a local file.
///
/// Single tracks take their extension from the configured format; album
/// bundles are always zip containers. The body is streamed to disk
/// chunk-by-chunk. On failure a partial file may remain, but the caller
/// never records the item as complete.
pub async fn fetch_item_file(
    api: &BandcampApi,
    settings: &Settings,
    url: &str,
    name: &str,
    kind: ItemKind,
    show_progress: bool,
) -> Result<PathBuf> {
    let extension = match kind {
        ItemKind::Track => settings.format.extension(),
        ItemKind::Album => "zip",
    };
    let output_path = artifact_path(&settings.music_path, name, extension);

    tracing::debug!("Downloading {} -> {}", url, output_path.display());

    let response = api.download_file(url).await?;

    let content_length = response.content_length();
    let progress = if show_progress
        && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false)
    {
        Some(create_download_bar(content_length.unwrap_or(0)))
    } else {
        None
    };

    // Stream to file
    let mut file = File::create(&output_path).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(ref pb) = progress {
            pb.set_position(downloaded);
        }
    }

    file.flush().await?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_track_uses_format_extension() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"audio-bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let settings = Settings {
            identity: "t".into(),
            music_path: dir.path().to_path_buf(),
            format: "flac".parse().unwrap(),
            ..Default::default()
        };
        let api = BandcampApi::with_base_url("t".into(), server.uri()).unwrap();

        let saved = fetch_item_file(
            &api,
            &settings,
            &format!("{}/file", server.uri()),
            "Night Drive",
            ItemKind::Track,
            false,
        )
        .await
        .unwrap();

        assert_eq!(saved, dir.path().join("Night Drive.flac"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"audio-bytes");
    }

    #[tokio::test]
    async fn test_album_is_always_zip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bundle"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zip-bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let settings = Settings {
            identity: "t".into(),
            music_path: dir.path().to_path_buf(),
            format: "flac".parse().unwrap(),
            ..Default::default()
        };
        let api = BandcampApi::with_base_url("t".into(), server.uri()).unwrap();

        let saved = fetch_item_file(
            &api,
            &settings,
            &format!("{}/bundle", server.uri()),
            "Some Album",
            ItemKind::Album,
            false,
        )
        .await
        .unwrap();

        assert_eq!(saved.extension().and_then(|e| e.to_str()), Some("zip"));
    }

    #[tokio::test]
    async fn test_http_error_creates_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let settings = Settings {
            identity: "t".into(),
            music_path: dir.path().to_path_buf(),
            ..Default::default()
        };
        let api = BandcampApi::with_base_url("t".into(), server.uri()).unwrap();

        let result = fetch_item_file(
            &api,
            &settings,
            &format!("{}/gone", server.uri()),
            "Missing",
            ItemKind::Track,
            false,
        )
        .await;

        assert!(matches!(result, Err(Error::Download(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
