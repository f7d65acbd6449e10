//! Independent, seedable random streams, one per decision category
//!
//! Draws in one category never shift the sequence of another, so a replay
//! stays in sync even when, say, knockback is disabled.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Decision categories that draw random numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomStream {
    Pain,
    KickbackDirection,
    ForwardFall,
    Lightning,
    Poison,
    DeathJitter,
    BotRespawn,
}

impl RandomStream {
    pub const ALL: [RandomStream; 7] = [
        RandomStream::Pain,
        RandomStream::KickbackDirection,
        RandomStream::ForwardFall,
        RandomStream::Lightning,
        RandomStream::Poison,
        RandomStream::DeathJitter,
        RandomStream::BotRespawn,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// One generator per [`RandomStream`]
#[derive(Debug, Clone)]
pub struct RandomStreams {
    seed: u64,
    streams: [ChaCha8Rng; 7],
}

impl RandomStreams {
    /// Seed every stream from a master seed
    pub fn new(seed: u64) -> Self {
        let streams = RandomStream::ALL.map(|s| ChaCha8Rng::seed_from_u64(stream_seed(seed, s)));
        RandomStreams { seed, streams }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reseed a single stream, leaving the others untouched
    pub fn reseed(&mut self, stream: RandomStream, seed: u64) {
        self.streams[stream.index()] = ChaCha8Rng::seed_from_u64(seed);
    }

    /// A byte in 0..=255
    pub fn byte(&mut self, stream: RandomStream) -> u8 {
        let value: u8 = self.streams[stream.index()].gen();
        trace!(?stream, value, "random byte");
        value
    }

    /// A full 32-bit value
    pub fn next_u32(&mut self, stream: RandomStream) -> u32 {
        let value: u32 = self.streams[stream.index()].gen();
        trace!(?stream, value, "random u32");
        value
    }
}

impl Default for RandomStreams {
    fn default() -> Self {
        Self::new(0)
    }
}

fn stream_seed(master: u64, stream: RandomStream) -> u64 {
    // splitmix64 step over the category index
    let mut z = master.wrapping_add((stream.index() as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
