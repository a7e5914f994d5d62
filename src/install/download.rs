//! Verified download of pinned installer payloads.
//!
//! Every remote installer cairn runs is fetched over HTTPS and checked
//! against a pinned SHA-256 digest before a single byte lands on disk.
//! A digest mismatch is fatal; there is no retry and no fallback URL.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{CairnError, Result};
use crate::install::scratch;
use crate::pins::PayloadPin;

/// Hex-encoded SHA-256 digest of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Downloads pinned payloads and writes them, verified, into the
/// run's scratch directory.
///
/// # Example
///
/// ```no_run
/// use cairn::install::PayloadFetcher;
/// use cairn::pins::PayloadPin;
/// use std::time::Duration;
///
/// let fetcher = PayloadFetcher::new(Duration::from_secs(60));
/// let pin = PayloadPin {
///     url: "https://example.com/install.sh".to_string(),
///     sha256: "..".to_string(),
///     file_name: "install.sh".to_string(),
/// };
/// let script = fetcher.fetch_verified(&pin).unwrap();
/// ```
pub struct PayloadFetcher {
    /// Request timeout.
    timeout: Duration,
    /// Where verified payloads are written.
    scratch_dir: PathBuf,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl PayloadFetcher {
    /// Create a fetcher with the specified timeout.
    pub fn new(timeout: Duration) -> Self {
        Self::with_scratch_dir(timeout, scratch::scratch_dir())
    }

    /// Create a fetcher writing into a custom scratch directory.
    pub fn with_scratch_dir(timeout: Duration, scratch_dir: PathBuf) -> Self {
        Self {
            timeout,
            scratch_dir,
            client: reqwest::blocking::Client::builder()
                .user_agent(concat!("cairn/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetch a payload, verify its digest, and write it executable into
    /// the scratch directory. Returns the path of the written file.
    ///
    /// Verification happens on the in-memory body; nothing touches disk
    /// until the digest matches the pin.
    pub fn fetch_verified(&self, payload: &PayloadPin) -> Result<PathBuf> {
        debug!("Fetching {}", payload.url);

        let response = self
            .client
            .get(&payload.url)
            .send()
            .map_err(|e| CairnError::DownloadFailed {
                url: payload.url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CairnError::DownloadFailed {
                url: payload.url.clone(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let body = response.bytes().map_err(|e| CairnError::DownloadFailed {
            url: payload.url.clone(),
            message: e.to_string(),
        })?;

        let actual = sha256_hex(&body);
        if !actual.eq_ignore_ascii_case(&payload.sha256) {
            return Err(CairnError::ChecksumMismatch {
                name: payload.file_name.clone(),
                expected: payload.sha256.clone(),
                actual,
            });
        }

        let path = self.write_payload(payload, &body)?;
        debug!(
            "Wrote {} ({} bytes, sha256 {})",
            path.display(),
            body.len(),
            actual
        );
        Ok(path)
    }

    fn write_payload(&self, payload: &PayloadPin, body: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.scratch_dir)?;
        let path = self.scratch_dir.join(&payload.file_name);
        fs::write(&path, body)?;
        set_executable(&path)?;
        Ok(path)
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the scratch directory payloads are written into.
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    const SCRIPT: &str = "#!/bin/sh\necho bootstrap\n";

    fn pin_for(url: String, sha256: &str) -> PayloadPin {
        PayloadPin {
            url,
            sha256: sha256.to_string(),
            file_name: "install.sh".to_string(),
        }
    }

    fn fetcher_in(temp: &TempDir) -> PayloadFetcher {
        PayloadFetcher::with_scratch_dir(Duration::from_secs(10), temp.path().join("scratch"))
    }

    #[test]
    fn reports_configured_timeout() {
        let temp = TempDir::new().unwrap();
        let fetcher =
            PayloadFetcher::with_scratch_dir(Duration::from_secs(42), temp.path().to_path_buf());
        assert_eq!(fetcher.timeout(), Duration::from_secs(42));
    }

    #[test]
    fn sha256_hex_matches_known_vector() {
        // sha256 of the empty string
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fetch_writes_verified_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/install.sh");
            then.status(200).body(SCRIPT);
        });

        let temp = TempDir::new().unwrap();
        let fetcher = fetcher_in(&temp);
        let pin = pin_for(server.url("/install.sh"), &sha256_hex(SCRIPT.as_bytes()));

        let path = fetcher.fetch_verified(&pin).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), SCRIPT);
        assert!(path.starts_with(fetcher.scratch_dir()));
    }

    #[cfg(unix)]
    #[test]
    fn written_payload_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/install.sh");
            then.status(200).body(SCRIPT);
        });

        let temp = TempDir::new().unwrap();
        let fetcher = fetcher_in(&temp);
        let pin = pin_for(server.url("/install.sh"), &sha256_hex(SCRIPT.as_bytes()));

        let path = fetcher.fetch_verified(&pin).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();

        assert_eq!(mode & 0o755, 0o755);
    }

    #[test]
    fn digest_comparison_is_case_insensitive() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/install.sh");
            then.status(200).body(SCRIPT);
        });

        let temp = TempDir::new().unwrap();
        let fetcher = fetcher_in(&temp);
        let upper = sha256_hex(SCRIPT.as_bytes()).to_uppercase();
        let pin = pin_for(server.url("/install.sh"), &upper);

        assert!(fetcher.fetch_verified(&pin).is_ok());
    }

    #[test]
    fn checksum_mismatch_aborts_before_any_write() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/install.sh");
            then.status(200).body(SCRIPT);
        });

        let temp = TempDir::new().unwrap();
        let fetcher = fetcher_in(&temp);
        let pin = pin_for(server.url("/install.sh"), &"0".repeat(64));

        let err = fetcher.fetch_verified(&pin).unwrap_err();

        match err {
            CairnError::ChecksumMismatch {
                name,
                expected,
                actual,
            } => {
                assert_eq!(name, "install.sh");
                assert_eq!(expected, "0".repeat(64));
                assert_eq!(actual, sha256_hex(SCRIPT.as_bytes()));
            }
            other => panic!("expected ChecksumMismatch, got {:?}", other),
        }
        // The scratch directory is only created for verified bytes.
        assert!(!fetcher.scratch_dir().exists());
    }

    #[test]
    fn http_error_maps_to_download_failed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.sh");
            then.status(404).body("Not Found");
        });

        let temp = TempDir::new().unwrap();
        let fetcher = fetcher_in(&temp);
        let pin = pin_for(server.url("/missing.sh"), &"0".repeat(64));

        let err = fetcher.fetch_verified(&pin).unwrap_err();

        match err {
            CairnError::DownloadFailed { url, message } => {
                assert!(url.contains("/missing.sh"));
                assert!(message.contains("404"), "message should mention 404: {}", message);
            }
            other => panic!("expected DownloadFailed, got {:?}", other),
        }
    }

    #[test]
    fn unreachable_server_maps_to_download_failed() {
        let temp = TempDir::new().unwrap();
        let fetcher = PayloadFetcher::with_scratch_dir(
            Duration::from_millis(200),
            temp.path().to_path_buf(),
        );
        // Port 9 is the discard service; nothing listens there in CI.
        let pin = pin_for("http://127.0.0.1:9/install.sh".to_string(), &"0".repeat(64));

        assert!(matches!(
            fetcher.fetch_verified(&pin),
            Err(CairnError::DownloadFailed { .. })
        ));
    }

    #[test]
    fn sends_pinned_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/install.sh")
                .header("user-agent", concat!("cairn/", env!("CARGO_PKG_VERSION")));
            then.status(200).body(SCRIPT);
        });

        let temp = TempDir::new().unwrap();
        let fetcher = fetcher_in(&temp);
        let pin = pin_for(server.url("/install.sh"), &sha256_hex(SCRIPT.as_bytes()));

        fetcher.fetch_verified(&pin).unwrap();
        mock.assert();
    }
}
