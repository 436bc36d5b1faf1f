use crate::error::Result;

pub trait Remote: Clone + Send {
    /// Whether a file is present at `url`.
    fn exists(&self, url: &str) -> Result<bool>;

    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
