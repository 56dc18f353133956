//! Queue derivation
//!
//! The queue is always rebuilt wholesale from a candidate set. Order:
//! 1. shuffle on: random permutation
//! 2. artist context: title, case-insensitive
//! 3. every candidate numbered: track number ascending
//! 4. otherwise: title, case-insensitive

use cadence_core::{ContextKind, Track};
use rand::seq::SliceRandom;
use rand::Rng;

/// Order `candidates` into a queue
pub fn order_candidates<R: Rng + ?Sized>(
    candidates: &[Track],
    kind: ContextKind,
    shuffle: bool,
    rng: &mut R,
) -> Vec<Track> {
    let mut ordered = candidates.to_vec();

    if shuffle {
        ordered.shuffle(rng);
    } else if kind == ContextKind::Artist {
        sort_by_title(&mut ordered);
    } else if !ordered.is_empty() && ordered.iter().all(|t| t.track_number.is_some()) {
        ordered.sort_by_key(|t| t.track_number);
    } else {
        sort_by_title(&mut ordered);
    }

    ordered
}

/// Position of the first entry with the same `(title, artist)` as `track`
pub fn position_of(queue: &[Track], track: &Track) -> Option<usize> {
    queue.iter().position(|t| t.same_identity(track))
}

/// Randomly permute a whole set
pub fn shuffled<R: Rng + ?Sized>(tracks: &[Track], rng: &mut R) -> Vec<Track> {
    let mut out = tracks.to_vec();
    out.shuffle(rng);
    out
}

fn sort_by_title(tracks: &mut [Track]) {
    tracks.sort_by_cached_key(|t| t.title.to_lowercase());
}
