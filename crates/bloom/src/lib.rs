//! A Bloom filter: a space-efficient probabilistic set-membership test.
//!
//! Grounded on the source's `bloomfilter.go`. The source configures a filter
//! with a chain of functional options (`SetN`, `SetP`, `WithCalculatedM`, …);
//! the rewrite keeps that shape as a builder over [`BloomConfig`] instead of
//! a slice of closures, since that is the idiomatic way to express the same
//! "some fields are derived from others" dependency in Rust.
//!
//! Each of the `k` set bits per key comes from Murmur3-32 seeded with the
//! integers `k, k-1, …, 1` in turn (spec.md §9, "Bloom filter seeding"),
//! matching the source's `hashStr(str, i)` loop in `Insert`/`Lookup`.

mod murmur3;

use bitset::Bitset;
use util::is_empty;

/// Bloom filter sizing/shape parameters, built incrementally like the
/// source's `bloomFilterConfig`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BloomConfig {
    /// Expected number of inserted elements.
    pub n: u64,
    /// Desired false-positive probability.
    pub p: f64,
    /// Number of bits in the filter.
    pub m: u32,
    /// Number of hash functions.
    pub k: u32,
}

impl BloomConfig {
    /// Starts an empty, all-zero configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `n`, the expected number of inserted elements.
    pub fn with_n(mut self, n: u64) -> Self {
        self.n = n;
        self
    }

    /// Sets `p`, the desired false-positive probability.
    pub fn with_p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    /// Sets `m`, the number of bits, directly.
    pub fn with_m(mut self, m: u32) -> Self {
        self.m = m;
        self
    }

    /// Sets `k`, the number of hash functions, directly.
    pub fn with_k(mut self, k: u32) -> Self {
        self.k = k;
        self
    }

    /// Derives `m = ceil(-n * ln(p) / ln(2)^2)`. Requires `n` and `p` to
    /// already be set.
    ///
    /// # Panics
    ///
    /// Panics if `n` or `p` is unset, matching the source's
    /// `WithCalculatedM`.
    pub fn with_calculated_m(mut self) -> Self {
        assert!(!is_empty(&self.n), "n (expected elements) cannot be empty");
        assert!(!is_empty(&self.p), "p (false-positive rate) cannot be empty");
        let m = (-1.0 * (self.n as f64) * self.p.ln()) / std::f64::consts::LN_2.powi(2);
        self.m = m.ceil() as u32;
        self
    }

    /// Derives `k = ceil(m/n * ln(2))`. Requires `m` and `n` to already be
    /// set.
    ///
    /// # Panics
    ///
    /// Panics if `m` or `n` is unset, matching the source's
    /// `WithCalculatedK`.
    pub fn with_calculated_k(mut self) -> Self {
        assert!(!is_empty(&self.m), "m (number of bits) cannot be empty");
        assert!(!is_empty(&self.n), "n (expected elements) cannot be empty");
        let k = (self.m as f64 / self.n as f64) * std::f64::consts::LN_2;
        self.k = k.ceil() as u32;
        self
    }
}

/// A Bloom filter: `Insert` never false-negates, `Lookup` may false-positive
/// at roughly the configured rate.
pub struct BloomFilter {
    config: BloomConfig,
    bucket: Bitset,
}

impl BloomFilter {
    /// Builds a filter from a fully-derived [`BloomConfig`] (`m` and `k`
    /// must both be set, directly or via `with_calculated_*`).
    pub fn new(config: BloomConfig) -> Self {
        let bucket = Bitset::new(config.m);
        Self { config, bucket }
    }

    /// Convenience constructor deriving both `m` and `k` from `n` and `p`,
    /// the common case.
    pub fn with_capacity(expected_items: u64, false_positive_rate: f64) -> Self {
        let config = BloomConfig::new()
            .with_n(expected_items)
            .with_p(false_positive_rate)
            .with_calculated_m();
        let config = config.with_calculated_k();
        Self::new(config)
    }

    /// Inserts `key`, setting `k` bits chosen by `k` separately seeded
    /// Murmur3-32 runs.
    pub fn insert(&mut self, key: &[u8]) {
        let m = self.bucket.size();
        let mut seed = self.config.k;
        while seed > 0 {
            let idx = murmur3::hash32(key, seed) % m;
            self.bucket.set(idx);
            seed -= 1;
        }
    }

    /// Returns `false` iff any of the `k` bits for `key` is unset — a
    /// definite "not present". Returns `true` otherwise ("possibly
    /// present").
    pub fn lookup(&self, key: &[u8]) -> bool {
        let m = self.bucket.size();
        let mut seed = self.config.k;
        while seed > 0 {
            let idx = murmur3::hash32(key, seed) % m;
            if !self.bucket.test(idx) {
                return false;
            }
            seed -= 1;
        }
        true
    }

    /// Estimated false-positive probability given the current `m`, `k`,
    /// and `n`: `(1 - (1 - 1/m)^(k*n))^k`.
    pub fn false_positive(&self) -> f64 {
        let m = self.bucket.size() as f64;
        let k = self.config.k as f64;
        let n = self.config.n as f64;
        (1.0 - (1.0 - 1.0 / m).powf(k * n)).powf(k)
    }

    /// Number of bits in the underlying bitset.
    pub fn num_bits(&self) -> u32 {
        self.bucket.size()
    }

    /// Number of hash functions.
    pub fn num_hashes(&self) -> u32 {
        self.config.k
    }
}

#[cfg(test)]
mod tests;
