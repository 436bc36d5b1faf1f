use std::{
    collections::HashSet,
    fs::{create_dir_all, File},
    io::Write,
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
};

use crate::{
    error::{Error, Result},
    remote::Remote,
};
use crossbeam_channel::{bounded, Receiver, Sender};

/// A local mirror of remote files, laid out as `root/YYYY/MM/DD/<file>`.
pub struct Archive<RA: Remote> {
    root: PathBuf,
    remote: RA,
}

impl<RA: 'static> Archive<RA>
where
    RA: Remote,
{
    pub fn connect<P>(root_path: P, remote: RA) -> Self
    where
        P: Into<PathBuf>,
    {
        let root = root_path.into();
        log::info!("Connected to archive at: {:?}", &root);
        Self { root, remote }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the file behind `url` lives in this archive.
    pub fn local_path(&self, url: &str) -> PathBuf {
        let segments: Vec<&str> = url.trim_end_matches('/').rsplit('/').take(4).collect();

        let mut pth = self.root.clone();
        if let [fname, day, month, year] = segments[..] {
            if is_digits(year, 4) && is_digits(month, 2) && is_digits(day, 2) {
                pth.push(year);
                pth.push(month);
                pth.push(day);
            }
            pth.push(fname);
        } else if let Some(fname) = segments.first() {
            pth.push(fname);
        }

        pth
    }

    /// Download every file in `urls` not already on disk and return all local paths.
    ///
    /// Files that fail to download or save are logged and left out of the result.
    pub fn retrieve_paths(&self, urls: &[String]) -> Result<Vec<PathBuf>> {
        let (to_path_accumulator, paths_to_accumulate) = bounded(100);
        let (to_downloader, needs_downloaded) = bounded(100);
        let (to_saver, from_downloader) = bounded(10);

        let accum_thrd = Self::start_accumulator_thread(paths_to_accumulate)?;
        self.start_download_threads(needs_downloaded, to_saver);
        let save_thrd = Self::start_save_thread(from_downloader, to_path_accumulator.clone())?;

        let mut seen: HashSet<PathBuf> = HashSet::new();

        for url in urls {
            let local_path = self.local_path(url);

            if !seen.insert(local_path.clone()) {
                log::debug!("Duplicate request for {:?}", local_path);
                continue;
            }

            if local_path.exists() {
                log::debug!("Skipping download for {:?}", local_path);
                to_path_accumulator
                    .send(local_path)
                    .map_err(|err| Error::channel(err.to_string()))?;
            } else {
                to_downloader
                    .send((url.clone(), local_path))
                    .map_err(|err| Error::channel(err.to_string()))?;
            }
        }

        drop(to_downloader);
        drop(to_path_accumulator);
        save_thrd
            .join()
            .map_err(|_| Error::channel("save thread panicked"))?;
        let mut to_ret = accum_thrd
            .join()
            .map_err(|_| Error::channel("accumulator thread panicked"))?;

        to_ret.sort();
        to_ret.dedup();
        Ok(to_ret)
    }
}

// Private methods and associated functions.

const NUM_DOWNLOADERS: usize = 3;

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_digit())
}

impl<RA: 'static> Archive<RA>
where
    RA: Remote,
{
    fn start_save_thread(
        files: Receiver<(PathBuf, Vec<u8>)>,
        to_accumulator: Sender<PathBuf>,
    ) -> Result<JoinHandle<()>> {
        let jh = thread::Builder::new()
            .name("Save Thread".into())
            .spawn(move || {
                for (pth, data) in files {
                    if let Some(dir) = pth.parent() {
                        if let Err(err) = create_dir_all(dir) {
                            log::error!("Error creating directory: {:?} : {}", dir, err);
                            continue;
                        }
                    }

                    let mut f = match File::create(&pth) {
                        Ok(f) => f,
                        Err(err) => {
                            log::error!("Error creating file: {:?} : {}", pth, err);
                            continue;
                        }
                    };

                    if let Err(err) = f.write_all(&data) {
                        log::error!("Error writing data to disk: {:?} : {}", pth, err);
                        continue;
                    }

                    log::debug!("Saved {:?}", pth);
                    if to_accumulator.send(pth).is_err() {
                        log::error!("Path accumulator hung up");
                        break;
                    }
                }
            })?;

        Ok(jh)
    }

    fn start_download_threads(
        &self,
        needs_downloaded: Receiver<(String, PathBuf)>,
        to_data_saver: Sender<(PathBuf, Vec<u8>)>,
    ) {
        let pool = threadpool::ThreadPool::with_name("Download Thread".to_owned(), NUM_DOWNLOADERS);

        for _ in 0..NUM_DOWNLOADERS {
            let remote = self.remote.clone();
            let to_data_saver = to_data_saver.clone();
            let needs_downloaded = needs_downloaded.clone();

            pool.execute(move || {
                for (url, local_path) in needs_downloaded {
                    log::info!("Downloading: {}", &url);

                    let data = match remote.fetch(&url) {
                        Ok(data) => data,
                        Err(err) => {
                            log::error!("Error downloading data: {} : {}", url, err);
                            continue;
                        }
                    };

                    if to_data_saver.send((local_path, data)).is_err() {
                        log::error!("Save thread hung up");
                        break;
                    }
                }
            });
        }
    }

    fn start_accumulator_thread(paths: Receiver<PathBuf>) -> Result<JoinHandle<Vec<PathBuf>>> {
        let th = thread::Builder::new()
            .name("PathBuf Accumulator".to_owned())
            .spawn(move || paths.into_iter().collect())?;

        Ok(th)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_remote::HttpRemote;
    use httpmock::{Method::GET, MockServer};
    use std::fs;
    use tempfile::tempdir;

    const DAY_ONE: &str = "/2016/01/01/lyra_20160101-000000_lev2_std.fits";
    const DAY_TWO: &str = "/2016/01/02/lyra_20160102-000000_lev2_std.fits";
    const DAY_THREE: &str = "/2016/01/03/lyra_20160103-000000_lev2_std.fits";

    #[test]
    fn test_local_path_layout() {
        let archive = Archive::connect("/data", HttpRemote::connect().unwrap());

        assert_eq!(
            archive.local_path("http://proba2.oma.be/lyra/data/bsd/2016/01/01/lyra.fits"),
            PathBuf::from("/data/2016/01/01/lyra.fits")
        );
        assert_eq!(
            archive.local_path("http://example.org/files/lyra.fits"),
            PathBuf::from("/data/lyra.fits")
        );
    }

    #[test]
    fn test_retrieve_downloads_and_skips() {
        let server = MockServer::start();
        let day_one = server.mock(|when, then| {
            when.method(GET).path(DAY_ONE);
            then.status(200).body("one");
        });
        let day_two = server.mock(|when, then| {
            when.method(GET).path(DAY_TWO);
            then.status(200).body("two");
        });

        let temp_dir = tempdir().unwrap();
        let archive = Archive::connect(temp_dir.path(), HttpRemote::connect().unwrap());

        let existing = archive.local_path(&server.url(DAY_TWO));
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "cached").unwrap();

        let urls = vec![server.url(DAY_ONE), server.url(DAY_TWO), server.url(DAY_THREE)];
        let paths = archive.retrieve_paths(&urls).unwrap();

        let first = temp_dir.path().join("2016/01/01/lyra_20160101-000000_lev2_std.fits");
        assert_eq!(paths, vec![first.clone(), existing.clone()]);
        assert_eq!(fs::read_to_string(&first).unwrap(), "one");
        assert_eq!(fs::read_to_string(&existing).unwrap(), "cached");

        day_one.assert_hits(1);
        day_two.assert_hits(0);
    }

    #[test]
    fn test_retrieve_repeated_url_once() {
        let server = MockServer::start();
        let day_one = server.mock(|when, then| {
            when.method(GET).path(DAY_ONE);
            then.status(200).body("one");
        });

        let temp_dir = tempdir().unwrap();
        let archive = Archive::connect(temp_dir.path(), HttpRemote::connect().unwrap());

        let urls = vec![server.url(DAY_ONE), server.url(DAY_ONE)];
        let paths = archive.retrieve_paths(&urls).unwrap();

        assert_eq!(paths, vec![archive.local_path(&server.url(DAY_ONE))]);
        day_one.assert_hits(1);
    }
}
