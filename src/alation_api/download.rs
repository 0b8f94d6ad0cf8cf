use std::{
    borrow::Cow,
    io,
    path::{Path, PathBuf},
};

use fs_err::tokio as fs;
use resolve_path::PathResolveExt;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

use super::{display_body, AlationApiError, AlationClient};

/// Size of the write buffer between the response stream and the file.
pub const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Absolute path the CSV was written to.
    pub path: PathBuf,
    pub bytes: u64,
}

/// Expands a leading `~` and makes the path absolute against the current
/// directory.
pub fn resolve_output_path(path: &Path) -> Result<PathBuf, AlationApiError> {
    path.try_resolve()
        .map(Cow::into_owned)
        .map_err(|source| AlationApiError::Io {
            path: path.to_owned(),
            source,
        })
}

impl AlationClient {
    /// Streams the body of `url` into `output`, replacing anything already
    /// there. Nothing is written unless the server answers with a success
    /// status. Parent directories are not created.
    pub async fn download_csv(
        &self,
        url: &Url,
        output: &Path,
    ) -> Result<DownloadSummary, AlationApiError> {
        let path = resolve_output_path(output)?;

        log::info!("Attempting to download CSV from {}", url);

        let mut response = self
            .with_timeout(url, self.client.get(url.clone()).send())
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = self.with_timeout(url, response.text()).await?;
            log::debug!("Response Body: {}", display_body(&body));

            return Err(AlationApiError::DownloadStatus { status, body });
        }

        let file_error = |source: io::Error| AlationApiError::Io {
            path: path.clone(),
            source,
        };

        log::debug!("writing to {}", path.display());

        let file = fs::File::create(&path).await.map_err(file_error)?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
        let mut bytes = 0;

        while let Some(chunk) = self.with_timeout(url, response.chunk()).await? {
            writer.write_all(&chunk).await.map_err(file_error)?;
            bytes += chunk.len() as u64;
            log::trace!("wrote {} bytes ({} total)", chunk.len(), bytes);
        }

        writer.flush().await.map_err(file_error)?;

        log::info!("Wrote {} bytes to {}", bytes, path.display());

        Ok(DownloadSummary { path, bytes })
    }
}
