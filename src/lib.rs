/**************************************************************************************************
 *                                           Public API
 *************************************************************************************************/
pub use crate::{
    archive::Archive,
    attrs::QueryAttr,
    dispatch::Dispatcher,
    error::{Error, Result},
    http_remote::HttpRemote,
    lyra::{LyraClient, DEFAULT_LEVEL},
    metadata::SourceMetadata,
    remote::Remote,
    scraper::{Scraper, Step},
    source::{DataSource, QueryRow},
    time_range::TimeRange,
};
/**************************************************************************************************
 *                                      Private Implementation
 *************************************************************************************************/
mod archive;
mod attrs;
mod dispatch;
mod error;
mod http_remote;
mod lyra;
mod metadata;
mod remote;
mod scraper;
mod source;
mod time_range;
