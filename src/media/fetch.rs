//! Plain HTTP downloads.

use crate::error::FetchError;
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Content type assumed when the server sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// A downloaded body and its declared content type.
#[derive(Clone, Debug)]
pub struct Fetched {
    pub content_type: String,
    pub body: Bytes,
}

impl Fetched {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url`; any non-success status is an error.
    async fn fetch(&self, url: &str) -> Result<Fetched>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(FetchError::from)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Fetched> {
        let res = self.client.get(url).send().await.map_err(FetchError::from)?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()).into());
        }
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let body = res.bytes().await.map_err(FetchError::from)?;
        tracing::debug!(url, content_type = %content_type, bytes = body.len(), "fetched");
        Ok(Fetched { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::Router;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetch_reads_body_and_content_type() {
        let base = serve(Router::new().route(
            "/cat.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, b'P', b'N', b'G']) }),
        ))
        .await;
        let fetched = HttpFetcher::new()
            .unwrap()
            .fetch(&format!("{base}/cat.png"))
            .await
            .unwrap();
        assert!(fetched.is_image());
        assert!(!fetched.is_video());
        assert_eq!(fetched.body.len(), 4);
    }

    #[tokio::test]
    async fn missing_or_empty_content_type_defaults_to_octet_stream() {
        use axum::body::Body;
        use axum::response::Response;

        let base = serve(
            Router::new()
                .route("/raw", get(|| async { Response::new(Body::from("raw bytes")) }))
                .route(
                    "/blank",
                    get(|| async {
                        Response::builder()
                            .header(header::CONTENT_TYPE, "")
                            .body(Body::from("blank"))
                            .unwrap()
                    }),
                ),
        )
        .await;
        let fetcher = HttpFetcher::new().unwrap();
        for path in ["raw", "blank"] {
            let fetched = fetcher.fetch(&format!("{base}/{path}")).await.unwrap();
            assert_eq!(fetched.content_type, DEFAULT_CONTENT_TYPE, "{path}");
            assert!(!fetched.is_image() && !fetched.is_video());
            assert_eq!(crate::media::mime_ext::extension_for(&fetched.content_type), "bin");
        }
    }

    #[tokio::test]
    async fn non_success_status_is_fetch_error() {
        let base = serve(Router::new().route("/gone", get(|| async { StatusCode::NOT_FOUND }))).await;
        let err = HttpFetcher::new()
            .unwrap()
            .fetch(&format!("{base}/gone"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "fetch error 404");
    }
}
