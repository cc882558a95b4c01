use std::io::{Read, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{RouteError, Result};

const CHUNK_SIZE: usize = 8192;

/// Download `url` into a fresh temp file.
///
/// The returned file is deleted when dropped, so an interrupted or failed
/// download never leaves anything behind.
pub fn download_to_temp(url: &str, timeout: u64) -> Result<NamedTempFile> {
    let client = Client::builder()
        .user_agent(concat!("routecycle/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(timeout))
        .timeout(Duration::from_secs(timeout))
        .build()
        .map_err(|e| RouteError::NetworkError(format!("failed to create client: {}", e)))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| RouteError::NetworkError(format!("failed to send request to {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(RouteError::NetworkError(format!(
            "failed to download from {}: status {}",
            url,
            response.status()
        )));
    }

    let pb = match response.content_length() {
        Some(total) => ProgressBar::new(total),
        None => ProgressBar::new_spinner(),
    };
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut tmp = tempfile::Builder::new()
        .prefix("routecycle-download-")
        .suffix(".txt")
        .tempfile()
        .map_err(RouteError::IoError)?;

    let mut downloaded: u64 = 0;
    let mut buffer = [0; CHUNK_SIZE];
    loop {
        let n = response
            .read(&mut buffer)
            .map_err(|e| RouteError::NetworkError(format!("failed to read from {}: {}", url, e)))?;
        if n == 0 {
            break;
        }
        tmp.write_all(&buffer[..n]).map_err(RouteError::IoError)?;
        downloaded += n as u64;
        pb.set_position(downloaded);
    }
    tmp.flush().map_err(RouteError::IoError)?;
    pb.finish_and_clear();

    info!("downloaded {} bytes from {}", downloaded, url);
    Ok(tmp)
}
