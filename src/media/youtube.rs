//! YouTube audio extraction.
//!
//! URL validation is done here; downloading is delegated to `yt-dlp`, which
//! must be on `PATH` (or configured explicitly).

use crate::error::MediaError;
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Title length kept for the audio file name.
pub const MAX_TITLE_CHARS: usize = 60;

const VIDEO_ID_LEN: usize = 11;

const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
    "www.youtube-nocookie.com",
    "youtube-nocookie.com",
];

const ID_PATH_PREFIXES: &[&str] = &["embed", "shorts", "v", "live"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: String,
}

impl VideoInfo {
    /// File name for the extracted audio: title cut to [`MAX_TITLE_CHARS`].
    pub fn audio_file_name(&self) -> String {
        let title: String = self.title.chars().take(MAX_TITLE_CHARS).collect();
        format!("{title}.mp3")
    }
}

#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn info(&self, url: &str) -> Result<VideoInfo>;

    /// Best available audio stream, fully buffered.
    async fn audio(&self, url: &str) -> Result<Bytes>;
}

fn is_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Video id of a YouTube watch/short/embed/share URL.
pub fn video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?.to_ascii_lowercase();
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

    let id = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else if YOUTUBE_HOSTS.contains(&host.as_str()) {
        match segments.next() {
            Some("watch") => parsed
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some(prefix) if ID_PATH_PREFIXES.contains(&prefix) => {
                segments.next().map(str::to_string)
            }
            _ => None,
        }
    } else {
        None
    };

    let id = id?;
    is_video_id(&id).then_some(id)
}

pub fn validate_url(url: &str) -> bool {
    video_id(url).is_some()
}

/// [`AudioExtractor`] backed by the `yt-dlp` command line tool.
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        tracing::debug!(program = %self.program.display(), ?args, "spawning extractor");
        let output = Command::new(&self.program)
            .args(["--no-playlist", "--no-warnings", "--quiet"])
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MediaError::Extractor(format!("failed to run: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.trim();
            return Err(MediaError::Extractor(if reason.is_empty() {
                format!("exited with {}", output.status)
            } else {
                reason.to_string()
            })
            .into());
        }
        Ok(output.stdout)
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl AudioExtractor for YtDlp {
    async fn info(&self, url: &str) -> Result<VideoInfo> {
        if !validate_url(url) {
            return Err(MediaError::InvalidYoutubeUrl.into());
        }
        let out = self
            .run(&["--skip-download", "--print", "title", url])
            .await?;
        let title = String::from_utf8_lossy(&out).trim().to_string();
        Ok(VideoInfo { title })
    }

    async fn audio(&self, url: &str) -> Result<Bytes> {
        if !validate_url(url) {
            return Err(MediaError::InvalidYoutubeUrl.into());
        }
        let out = self.run(&["-f", "bestaudio", "-o", "-", url]).await?;
        Ok(Bytes::from(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_url_shapes() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "http://m.youtube.com/watch?v=dQw4w9WgXcQ&t=10",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(video_id(url).as_deref(), Some("dQw4w9WgXcQ"), "{url}");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for url in [
            "not a url",
            "ftp://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://vimeo.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/channel/UC123",
            "https://youtu.be/",
            "https://www.youtube.com/watch?v=dQw4w9WgXc!",
        ] {
            assert!(!validate_url(url), "{url}");
        }
    }

    #[test]
    fn file_name_truncates_title() {
        let info = VideoInfo {
            title: "x".repeat(100),
        };
        assert_eq!(info.audio_file_name(), format!("{}.mp3", "x".repeat(60)));
        let short = VideoInfo {
            title: "Song".into(),
        };
        assert_eq!(short.audio_file_name(), "Song.mp3");
    }

    #[tokio::test]
    async fn invalid_url_fails_before_spawning() {
        let yt = YtDlp::new("/nonexistent/yt-dlp");
        let err = yt.info("https://example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "Not a valid YouTube URL");
    }

    #[tokio::test]
    async fn missing_binary_is_extractor_error() {
        let yt = YtDlp::new("/nonexistent/yt-dlp");
        let err = yt
            .audio("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Media(MediaError::Extractor(_))
        ));
    }
}
