//! Seeded pseudo-random streams keyed by strings.
//!
//! Two stages: an xmur3-style string hash that itself yields a sequence of
//! well-mixed 32-bit words, and a four-word small fast counter generator
//! seeded from the first four of those words. Every operation is wrapping
//! `u32` arithmetic, so any host (native, WASM, or a JavaScript port) that
//! follows the same steps produces bit-identical floats.
//!
//! # Example
//!
//! ```rust
//! use livepulse_core::rng::SeededRng;
//!
//! let mut a = SeededRng::from_seed_str("pivotr|bucket|0");
//! let mut b = SeededRng::from_seed_str("pivotr|bucket|0");
//! assert_eq!(a.next_f64(), b.next_f64());
//! ```

/// 2^32 as a float, the divisor that maps a `u32` onto `[0, 1)`.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// String hash that keeps producing mixed words after the input is consumed.
#[derive(Clone, Debug)]
pub struct SeedHasher {
    h: u32,
}

impl SeedHasher {
    /// Fold a seed string into the hash state.
    ///
    /// Characters are consumed as UTF-16 code units so non-ASCII seeds hash
    /// the same way browser hosts see them.
    #[must_use]
    pub fn new(seed: &str) -> Self {
        let len = seed.encode_utf16().count() as u32;
        let mut h = 1_779_033_703_u32 ^ len;
        for unit in seed.encode_utf16() {
            h = (h ^ u32::from(unit)).wrapping_mul(3_432_918_353);
            h = h.rotate_left(13);
        }
        Self { h }
    }

    /// Produce the next mixed 32-bit word.
    pub fn next_u32(&mut self) -> u32 {
        let mut h = self.h;
        h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
        h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
        h ^= h >> 16;
        self.h = h;
        h
    }
}

/// Four-word counter generator (sfc32 family).
///
/// `d` only advances as a counter; the emitted word is `a + b` of the
/// pre-step state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl SeededRng {
    /// Create a generator from explicit state words.
    #[must_use]
    pub const fn from_state(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self { a, b, c, d }
    }

    /// Create a generator seeded by hashing `seed`.
    ///
    /// Total over every input, including the empty string.
    #[must_use]
    pub fn from_seed_str(seed: &str) -> Self {
        let mut hasher = SeedHasher::new(seed);
        let a = hasher.next_u32();
        let b = hasher.next_u32();
        let c = hasher.next_u32();
        let d = hasher.next_u32();
        Self::from_state(a, b, c, d)
    }

    /// Generate the next raw 32-bit word.
    pub fn next_u32(&mut self) -> u32 {
        let t = self.a.wrapping_add(self.b);
        self.d = self.d.wrapping_add(1);
        self.a = self.b ^ (self.b >> 9);
        self.b = self.c.wrapping_add(self.c << 3);
        self.c = self.c.rotate_left(21).wrapping_add(t);
        t
    }

    /// Generate a float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// Generate `base + floor(next * span)`.
    pub fn next_offset(&mut self, base: u32, span: u32) -> u32 {
        base + (self.next_f64() * f64::from(span)).floor() as u32
    }

    /// Generate `base + next * span`.
    ///
    /// Kept as a separate multiply and add; a fused multiply-add would round
    /// differently from hosts that lack one.
    #[allow(clippy::suboptimal_flops)]
    pub fn next_scaled(&mut self, base: f64, span: f64) -> f64 {
        base + self.next_f64() * span
    }

    /// Centered jitter in `[-amplitude / 2, amplitude / 2)`.
    pub fn next_jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() - 0.5) * amplitude
    }
}

impl Iterator for SeededRng {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}
