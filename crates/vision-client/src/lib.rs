//! Vision Client
//!
//! Network access to the remote inference API.
//!
//! The gateway is built from an explicit [`ApiConfig`], so tests and callers
//! can point it at any base URL. Both operations accept a
//! `CancellationToken`; a cancelled request resolves to
//! [`vision_core::Error::Cancelled`].

pub mod config;
pub mod gateway;
pub mod samples;
pub mod upload;

pub use config::{ApiConfig, BuildMode, API_URL_ENV, DEFAULT_DEV_API_URL};
pub use gateway::{HttpGateway, InferenceApi};
pub use samples::fetch_sample;
pub use upload::ImageUpload;

pub use tokio_util::sync::CancellationToken;
