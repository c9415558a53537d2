// file: src/downloader/avatar.rs
// description: sequential best-effort avatar downloads over http
// reference: https://docs.rs/reqwest

use crate::config::DownloadConfig;
use crate::error::{PipelineError, Result};
use crate::models::FollowedAccount;
use crate::pipeline::progress::{DownloadStats, ProgressTracker};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub struct AvatarDownloader {
    client: Client,
    avatar_dir: PathBuf,
    base_url: Option<Url>,
}

impl AvatarDownloader {
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        let base_url = config.base_url.as_deref().map(Url::parse).transpose()?;

        Ok(Self {
            client,
            avatar_dir: config.avatar_dir.clone(),
            base_url,
        })
    }

    pub fn avatar_dir(&self) -> &Path {
        &self.avatar_dir
    }

    /// Downloads every avatar in list order and records where it was saved.
    /// A failed record gets no local path; only a failure to create the
    /// avatar directory aborts the run.
    pub async fn download_all(
        &self,
        accounts: &mut [FollowedAccount],
        progress: &ProgressTracker,
    ) -> Result<DownloadStats> {
        tokio::fs::create_dir_all(&self.avatar_dir)
            .await
            .map_err(|e| PipelineError::file_operation(&self.avatar_dir, e))?;

        info!(
            "Downloading avatars for {} accounts into {}",
            accounts.len(),
            self.avatar_dir.display()
        );

        for account in accounts.iter_mut() {
            let handle = account.handle_or_unknown().to_string();
            progress.set_message(handle.clone());

            let Some(avatar_url) = account
                .avatar_url
                .clone()
                .filter(|url| !url.trim().is_empty())
            else {
                debug!("No avatar URL for {}", handle);
                account.set_local_avatar(None);
                progress.inc_skipped();
                continue;
            };

            let target = self.avatar_dir.join(account.avatar_file_name());

            match self.download_to(&avatar_url, &target).await {
                Ok(bytes) => {
                    debug!("Saved avatar for {} ({} bytes)", handle, bytes);
                    account.set_local_avatar(Some(target));
                    progress.inc_downloaded(bytes);
                }
                Err(e) => {
                    warn!("Failed to download avatar for {}: {}", handle, e);
                    account.set_local_avatar(None);
                    progress.inc_failed();
                }
            }
        }

        Ok(progress.download_stats())
    }

    async fn download_to(&self, raw_url: &str, target: &Path) -> Result<u64> {
        let url = self.resolve(raw_url)?;

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(PipelineError::Download {
                url: url.to_string(),
                message: format!("server responded with status {}", response.status()),
            });
        }

        let body = response.bytes().await?;

        tokio::fs::write(target, &body)
            .await
            .map_err(|e| PipelineError::file_operation(target, e))?;

        Ok(body.len() as u64)
    }

    /// Absolute http(s) URLs pass through; anything relative needs a base.
    pub fn resolve(&self, raw_url: &str) -> Result<Url> {
        let url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(raw_url)?,
                None => {
                    return Err(PipelineError::Download {
                        url: raw_url.to_string(),
                        message: "relative URL and no download.base_url configured".to_string(),
                    });
                }
            },
            Err(e) => return Err(e.into()),
        };

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(PipelineError::Download {
                url: raw_url.to_string(),
                message: format!("unsupported scheme '{}'", scheme),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const AVATAR_BYTES: &[u8] = b"\xFF\xD8\xFFfake-jpeg";

    /// Minimal HTTP/1.1 responder: `/ok.jpg` and the landing page `/` succeed,
    /// everything else is 404.
    async fn spawn_stub_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    loop {
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");

                    let (status, body): (&str, &[u8]) = if path == "/ok.jpg" {
                        ("200 OK", AVATAR_BYTES)
                    } else if path == "/" {
                        ("200 OK", b"<html>landing page</html>")
                    } else {
                        ("404 Not Found", b"missing")
                    };

                    let head = format!(
                        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        status,
                        body.len()
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    fn download_config(dir: &Path, base_url: Option<String>) -> DownloadConfig {
        DownloadConfig {
            avatar_dir: dir.join("avatars"),
            timeout_secs: 5,
            user_agent: "following-export-test".to_string(),
            base_url,
            show_progress: false,
        }
    }

    fn hidden_progress(total: usize) -> ProgressTracker {
        ProgressTracker::with_visibility(total, false, false)
    }

    fn account(handle: &str, url: Option<String>) -> FollowedAccount {
        FollowedAccount::new(None, Some(handle.to_string()), url)
    }

    #[test]
    fn test_resolve_absolute_and_relative() {
        let temp = TempDir::new().unwrap();
        let downloader = AvatarDownloader::new(&download_config(
            temp.path(),
            Some("https://www.example.com/user/".to_string()),
        ))
        .unwrap();

        assert_eq!(
            downloader.resolve("https://cdn.example.com/a.jpg").unwrap().as_str(),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(
            downloader.resolve("/img/a.jpg").unwrap().as_str(),
            "https://www.example.com/img/a.jpg"
        );
        assert_eq!(
            downloader.resolve("//cdn.example.com/b.jpg").unwrap().as_str(),
            "https://cdn.example.com/b.jpg"
        );
        assert!(downloader.resolve("data:image/png;base64,AAAA").is_err());
    }

    #[test]
    fn test_relative_url_without_base_fails() {
        let temp = TempDir::new().unwrap();
        let downloader = AvatarDownloader::new(&download_config(temp.path(), None)).unwrap();
        assert!(matches!(
            downloader.resolve("/img/a.jpg"),
            Err(PipelineError::Download { .. })
        ));
    }

    #[tokio::test]
    async fn test_download_all_best_effort() {
        let base = spawn_stub_server().await;
        let temp = TempDir::new().unwrap();
        let downloader = AvatarDownloader::new(&download_config(temp.path(), None)).unwrap();

        let mut accounts = vec![
            account("alice", Some(format!("{}/ok.jpg", base))),
            account("bob", Some(format!("{}/gone.jpg", base))),
            account("carol", None),
            account("dave", Some("relative/path.jpg".to_string())),
        ];
        let progress = hidden_progress(accounts.len());

        let stats = downloader.download_all(&mut accounts, &progress).await.unwrap();

        let expected = temp.path().join("avatars").join("alice.jpg");
        assert_eq!(accounts[0].local_avatar_path.as_deref(), Some(expected.as_path()));
        assert_eq!(std::fs::read(&expected).unwrap(), AVATAR_BYTES);
        assert_eq!(accounts[1].local_avatar_path, None);
        assert_eq!(accounts[2].local_avatar_path, None);
        assert_eq!(accounts[3].local_avatar_path, None);

        assert_eq!(
            stats,
            DownloadStats {
                downloaded: 1,
                failed: 2,
                skipped: 1,
                bytes: AVATAR_BYTES.len() as u64,
            }
        );
    }

    #[tokio::test]
    async fn test_blank_avatar_url_is_skipped_even_with_base() {
        let base = spawn_stub_server().await;
        let temp = TempDir::new().unwrap();
        let downloader =
            AvatarDownloader::new(&download_config(temp.path(), Some(format!("{}/", base))))
                .unwrap();

        let mut accounts = vec![
            account("eve", Some(String::new())),
            account("frank", Some("   ".to_string())),
        ];
        let progress = hidden_progress(accounts.len());

        let stats = downloader.download_all(&mut accounts, &progress).await.unwrap();

        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.downloaded, 0);
        assert_eq!(stats.failed, 0);
        assert_eq!(accounts[0].local_avatar_path, None);
        assert_eq!(accounts[1].local_avatar_path, None);
        assert!(!temp.path().join("avatars").join("eve.jpg").exists());
    }

    #[tokio::test]
    async fn test_relative_urls_use_base() {
        let base = spawn_stub_server().await;
        let temp = TempDir::new().unwrap();
        let downloader =
            AvatarDownloader::new(&download_config(temp.path(), Some(format!("{}/", base))))
                .unwrap();

        let mut accounts = vec![account("a/b", Some("ok.jpg".to_string()))];
        let progress = hidden_progress(1);
        downloader.download_all(&mut accounts, &progress).await.unwrap();

        let expected = temp.path().join("avatars").join("a_b.jpg");
        assert_eq!(accounts[0].local_avatar_path.as_deref(), Some(expected.as_path()));
    }

    #[tokio::test]
    async fn test_avatar_dir_is_created() {
        let temp = TempDir::new().unwrap();
        let downloader = AvatarDownloader::new(&download_config(temp.path(), None)).unwrap();
        let progress = hidden_progress(0);

        downloader.download_all(&mut [], &progress).await.unwrap();
        assert!(downloader.avatar_dir().is_dir());
    }
}
