use crate::{
    error::{Error, Result},
    remote::Remote,
};
use reqwest::{blocking::Client, StatusCode};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A plain HTTP file server, probed with `HEAD` and fetched with `GET`.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
}

impl HttpRemote {
    pub fn connect() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        log::info!("HTTP remote ready, timeout {:?}", timeout);

        Ok(HttpRemote { client })
    }
}

impl Remote for HttpRemote {
    fn exists(&self, url: &str) -> Result<bool> {
        let response = self.client.head(url).send()?;
        let status = response.status();

        log::debug!("HEAD {} -> {}", url, status);

        match status {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::GONE => Ok(false),
            s => Err(Error::Status {
                url: url.to_owned(),
                code: s.as_u16(),
            }),
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?;
        let status = response.status();

        if !status.is_success() {
            log::warn!("Download of {} returned {}", url, status);
            return Err(Error::Status {
                url: url.to_owned(),
                code: status.as_u16(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}
