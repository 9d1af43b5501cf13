use anyhow::Result;

use crate::episode::Sample;

#[cfg_attr(test, mockall::automock)]
pub trait SampleSource {
    /// Produce the chronologically ordered samples inside the caller's time
    /// window. Timestamps must be non-decreasing; duplicates are allowed.
    fn samples(&mut self) -> Result<Vec<Sample>>;
}
