//! External media extraction seam.
//!
//! The hard work of resolving a URL to downloadable streams, fetching
//! them, and normalizing the container lives in an external binary
//! (`yt-dlp` driving `ffmpeg`). This module wraps that collaborator
//! behind a trait so the HTTP layer never touches process plumbing and
//! tests can substitute a scripted stand-in.
//!
//! ## Key Components
//!
//! - [`MediaExtractor`] - trait the request handler is written against
//! - [`YtDlp`] - subprocess-backed implementation
//! - [`MediaInfo`] - lenient view of the extractor's metadata output
//! - [`ExtractorError`] - failure detail surfaced to the client

mod traits;
mod types;
mod ytdlp;

pub use traits::{ExtractorError, MediaExtractor};
pub use types::MediaInfo;
pub use ytdlp::YtDlp;
