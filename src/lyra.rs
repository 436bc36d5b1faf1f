use crate::{
    attrs::QueryAttr,
    error::Result,
    http_remote::HttpRemote,
    metadata::SourceMetadata,
    remote::Remote,
    scraper::Scraper,
    source::DataSource,
    time_range::TimeRange,
};
use chrono::{naive::NaiveDateTime, Duration, NaiveDate};

/// Processing level used when a query does not name one.
pub const DEFAULT_LEVEL: u32 = 2;

const BASE_URL: &str = "http://proba2.oma.be/lyra/data/bsd/";
const FILE_PATTERN: &str = "%Y/%m/%d/lyra_%Y%m%d-000000_lev{level}_std.fits";

const LYRA_METADATA: SourceMetadata = SourceMetadata {
    source: "Proba2",
    instrument: "lyra",
    physobs: "irradiance",
    provider: "esa",
};

/// Daily LYRA irradiance files from the PROBA2 Science Center archive.
///
/// The archive holds one FITS file per day and processing level under
/// `http://proba2.oma.be/lyra/data/bsd/YYYY/MM/DD/`.
#[derive(Debug, Clone)]
pub struct LyraClient<RA: Remote> {
    base_url: String,
    remote: RA,
    meta: SourceMetadata,
}

impl LyraClient<HttpRemote> {
    pub fn connect() -> Result<Self> {
        Ok(Self::new(HttpRemote::connect()?))
    }
}

impl<RA: 'static> LyraClient<RA>
where
    RA: Remote,
{
    pub fn new(remote: RA) -> Self {
        Self::with_base_url(remote, BASE_URL)
    }

    /// Point the client at a mirror of the archive.
    pub fn with_base_url(remote: RA, base_url: &str) -> Self {
        let mut base_url = base_url.to_owned();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        log::info!("LYRA archive at: {}", &base_url);

        LyraClient {
            base_url,
            remote,
            meta: LYRA_METADATA,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn remote(&self) -> &RA {
        &self.remote
    }

    fn scraper(&self, level: u32) -> Result<Scraper> {
        let pattern = format!("{}{}", self.base_url.replace('%', "%%"), FILE_PATTERN);
        Scraper::new(&pattern)?.param("level", level)
    }
}

impl<RA: 'static> DataSource for LyraClient<RA>
where
    RA: Remote,
{
    fn name(&self) -> &'static str {
        "LYRAClient"
    }

    fn resolve_range(&self, range: &TimeRange, level: Option<u32>) -> Result<Vec<String>> {
        let level = level.unwrap_or(DEFAULT_LEVEL);
        log::info!(
            "Resolving LYRA level {} files: start - {} end - {}",
            level,
            range.start(),
            range.end()
        );

        self.scraper(level)?.filelist(range, &self.remote)
    }

    fn resolve_date(&self, date: NaiveDate, level: Option<u32>) -> String {
        format!(
            "{}{}lyra_{}-000000_lev{}_std.fits",
            self.base_url,
            date.format("%Y/%m/%d/"),
            date.format("%Y%m%d"),
            level.unwrap_or(DEFAULT_LEVEL)
        )
    }

    fn metadata(&self) -> SourceMetadata {
        self.meta
    }

    fn can_handle(&self, attrs: &[QueryAttr]) -> bool {
        let all_known = attrs.iter().all(|attr| {
            matches!(
                attr,
                QueryAttr::Time(_) | QueryAttr::Instrument(_) | QueryAttr::Level(_)
            )
        });

        for attr in attrs {
            if let QueryAttr::Instrument(name) = attr {
                if name.to_lowercase() == "lyra" {
                    return all_known;
                }
            }
        }

        false
    }

    fn coverage(&self, url: &str) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let level = level_of(url)?;
        let start = self.scraper(level).ok()?.extract_time(url)?;

        let end = start.checked_add_signed(Duration::days(1))?;

        Some((start, end))
    }
}

fn level_of(url: &str) -> Option<u32> {
    let (_, tail) = url.rsplit_once("_lev")?;
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();

    digits.parse().ok()
}
