use crate::keyframe::accumulator::record_deletion;
use crate::keyframe::model::Keyframe;

/// Counts reported by [`consolidate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsolidateStats {
    /// Keyframes folded into the destination.
    pub keyframes: usize,
    /// Create/delete pairs that cancelled out.
    pub cancelled: usize,
}

/// Fold the durable facts of `saved` into `dest`, in order.
///
/// Loads and creations are appended in order. Each deletion goes through the same
/// cancellation as a live deletion, so an instance created in an earlier keyframe of the run
/// (or already pending in `dest`) and deleted in a later one vanishes entirely. A creation
/// whose deletion is already pending in `dest` cancels against it the same way. State updates
/// and user transforms are per-interval observations and are not carried over.
pub fn consolidate<'a, I>(saved: I, dest: &mut Keyframe) -> ConsolidateStats
where
    I: IntoIterator<Item = &'a Keyframe>,
{
    let mut stats = ConsolidateStats::default();
    for keyframe in saved {
        stats.keyframes += 1;
        dest.loads.extend(keyframe.loads.iter().cloned());
        for (key, creation) in &keyframe.creations {
            // Keys are never reused, so a pending deletion in `dest` happened after this creation.
            match dest.deletions.iter().position(|k| k == key) {
                Some(idx) => {
                    dest.deletions.remove(idx);
                    stats.cancelled += 1;
                }
                None => dest.creations.push((*key, creation.clone())),
            }
        }
        for &key in &keyframe.deletions {
            if record_deletion(dest, key) {
                stats.cancelled += 1;
            }
        }
    }
    if stats.keyframes > 0 {
        tracing::debug!(
            keyframes = stats.keyframes,
            cancelled = stats.cancelled,
            "consolidated saved keyframes"
        );
    }
    stats
}

#[cfg(test)]
#[path = "../../tests/unit/keyframe/consolidate.rs"]
mod tests;
