use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

pub const DEFAULT_BUCKET_RATIO: usize = 16;
pub const DEFAULT_SPLIT_RATIO: usize = 24;

/// Bucket sizing parameters.
///
/// `bucket_ratio` only matters for bulk construction, where `N` elements are
/// cut into `ceil(sqrt(N / bucket_ratio))` buckets. `split_ratio` is checked
/// after every insertion: a bucket longer than
/// `bucket_count * split_ratio` is split in half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ratios {
    pub bucket_ratio: usize,
    pub split_ratio: usize,
}

impl Ratios {
    pub const DEFAULT: Ratios = Ratios {
        bucket_ratio: DEFAULT_BUCKET_RATIO,
        split_ratio: DEFAULT_SPLIT_RATIO,
    };

    pub const fn new(bucket_ratio: usize, split_ratio: usize) -> Self {
        Ratios { bucket_ratio, split_ratio }
    }

    /// Both ratios must be non-zero; a zero split ratio would split singleton
    /// buckets into an empty half.
    pub fn validate(self) -> Result<Self> {
        if self.bucket_ratio == 0 {
            return Err(Error::InvalidRatio { name: "bucket_ratio", value: 0 });
        }
        if self.split_ratio == 0 {
            return Err(Error::InvalidRatio { name: "split_ratio", value: 0 });
        }
        Ok(self)
    }
}

impl Default for Ratios {
    fn default() -> Self {
        Ratios::DEFAULT
    }
}

/// Process-wide sizing for one container kind.
///
/// Every container kind owns one `static Tuning`; changing it affects all
/// instances of that kind, including ones already built. Only bucket shapes
/// change, never contents.
#[derive(Debug)]
pub struct Tuning {
    bucket_ratio: AtomicUsize,
    split_ratio: AtomicUsize,
}

impl Tuning {
    pub const fn new(ratios: Ratios) -> Self {
        Tuning {
            bucket_ratio: AtomicUsize::new(ratios.bucket_ratio),
            split_ratio: AtomicUsize::new(ratios.split_ratio),
        }
    }

    pub fn get(&self) -> Ratios {
        Ratios {
            bucket_ratio: self.bucket_ratio.load(Ordering::Relaxed),
            split_ratio: self.split_ratio.load(Ordering::Relaxed),
        }
    }

    pub fn bucket_ratio(&self) -> usize {
        self.bucket_ratio.load(Ordering::Relaxed)
    }

    pub fn split_ratio(&self) -> usize {
        self.split_ratio.load(Ordering::Relaxed)
    }

    pub fn set(&self, ratios: Ratios) -> Result<()> {
        let ratios = ratios.validate().inspect_err(|err| {
            tracing::warn!(%err, "rejected bucket tuning");
        })?;
        self.store(ratios);
        tracing::debug!(
            bucket_ratio = ratios.bucket_ratio,
            split_ratio = ratios.split_ratio,
            "bucket tuning updated"
        );
        Ok(())
    }

    pub fn reset(&self) {
        self.store(Ratios::DEFAULT);
        tracing::debug!("bucket tuning reset to defaults");
    }

    /// Applies `ratios` until the returned guard is dropped, then restores
    /// whatever was configured before.
    pub fn scoped(&self, ratios: Ratios) -> Result<TuningGuard<'_>> {
        let previous = self.get();
        self.set(ratios)?;
        Ok(TuningGuard { tuning: self, previous })
    }

    fn store(&self, ratios: Ratios) {
        self.bucket_ratio.store(ratios.bucket_ratio, Ordering::Relaxed);
        self.split_ratio.store(ratios.split_ratio, Ordering::Relaxed);
    }
}

/// Restores a [`Tuning`] on drop. See [`Tuning::scoped`].
#[must_use = "the previous tuning is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TuningGuard<'a> {
    tuning: &'a Tuning,
    previous: Ratios,
}

impl Drop for TuningGuard<'_> {
    fn drop(&mut self) {
        self.tuning.store(self.previous);
        tracing::debug!(
            bucket_ratio = self.previous.bucket_ratio,
            split_ratio = self.previous.split_ratio,
            "bucket tuning restored"
        );
    }
}
