use std::{fmt, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Root seed of all random draws made by one transform call.
///
/// This is a 128-bit (16-byte) seed. Every group derives its own generator
/// from it (see [`Self::group_rng`]), so the same seed reproduces the same
/// output regardless of how groups are scheduled across threads.
///
/// Seeds are written as 32 lower-case hex digits, both in JSON and through
/// [`Display`](fmt::Display) / [`FromStr`].
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use schaake_dependence::ShuffleSeed;
///
/// let seed: ShuffleSeed = rand::rng().random();
/// let parsed: ShuffleSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShuffleSeed([u8; 16]);

impl ShuffleSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(num: u128) -> Self {
        Self(num.to_be_bytes())
    }

    /// Generator for the group with canonical index `index`.
    ///
    /// The first half of the seed is the PCG state and the second half the
    /// base stream; the group index is added to the stream, so each group
    /// draws from its own sequence.
    #[must_use]
    pub fn group_rng(&self, index: usize) -> Pcg32 {
        let [state, stream] = [&self.0[..8], &self.0[8..]].map(|half| {
            let mut bytes = [0; 8];
            bytes.copy_from_slice(half);
            u64::from_be_bytes(bytes)
        });
        Pcg32::new(state, stream.wrapping_add(index as u64))
    }
}

impl fmt::Display for ShuffleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// A seed string was not 32 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed '{input}': expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for ShuffleSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self::from_u128(num))
    }
}

impl Serialize for ShuffleSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShuffleSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<ShuffleSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShuffleSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShuffleSeed(seed)
    }
}
