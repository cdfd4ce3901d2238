//! Media helpers behind the sticker, download and YouTube commands.

pub mod fetch;
pub mod mime_ext;
pub mod qr;
pub mod sticker;
pub mod youtube;

pub use fetch::{Fetched, Fetcher, HttpFetcher};
pub use sticker::image_to_sticker;
pub use youtube::{AudioExtractor, VideoInfo, YtDlp};
