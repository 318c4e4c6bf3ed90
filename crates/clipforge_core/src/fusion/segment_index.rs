//! Interval index over diarization segments.
//!
//! Segments are sorted by start time alongside a running prefix maximum of
//! end times. A point query binary-searches the start array and walks left
//! only while the prefix maximum still reaches the query point, giving
//! O(log S + k) per lookup instead of a full scan.

use crate::models::SpeakerSegment;

/// Sorted segment index supporting point-coverage queries.
#[derive(Debug)]
pub struct SegmentIndex {
    /// Segments sorted by (start, end, speaker) for deterministic order.
    segments: Vec<SpeakerSegment>,
    /// `prefix_max_end[i]` = max end among `segments[0..=i]`.
    prefix_max_end: Vec<i64>,
}

impl SegmentIndex {
    /// Build an index from raw segments.
    pub fn new(mut segments: Vec<SpeakerSegment>) -> Self {
        segments.sort_by(|a, b| {
            a.start_ms
                .cmp(&b.start_ms)
                .then(a.end_ms.cmp(&b.end_ms))
                .then(a.speaker_id.cmp(&b.speaker_id))
        });

        let mut prefix_max_end = Vec::with_capacity(segments.len());
        let mut running = i64::MIN;
        for segment in &segments {
            running = running.max(segment.end_ms);
            prefix_max_end.push(running);
        }

        Self {
            segments,
            prefix_max_end,
        }
    }

    /// Number of indexed segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments covering the given instant, inclusive at both ends.
    ///
    /// Returned in index order (start, end, speaker), so callers get a
    /// deterministic candidate list regardless of input order.
    pub fn covering(&self, instant_ms: i64) -> Vec<&SpeakerSegment> {
        // First index whose start is past the instant; only earlier
        // segments can cover it.
        let upper = self
            .segments
            .partition_point(|s| s.start_ms <= instant_ms);

        let mut hits = Vec::new();
        for i in (0..upper).rev() {
            if self.prefix_max_end[i] < instant_ms {
                // Nothing to the left reaches this far right.
                break;
            }
            if self.segments[i].end_ms >= instant_ms {
                hits.push(&self.segments[i]);
            }
        }
        hits.reverse();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(speaker: &str, start: i64, end: i64) -> SpeakerSegment {
        SpeakerSegment::new(speaker, start, end)
    }

    #[test]
    fn empty_index_covers_nothing() {
        let index = SegmentIndex::new(Vec::new());
        assert!(index.is_empty());
        assert!(index.covering(100).is_empty());
    }

    #[test]
    fn point_inside_single_segment() {
        let index = SegmentIndex::new(vec![seg("A", 0, 900)]);
        let hits = index.covering(250);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].speaker_id.as_str(), "A");
    }

    #[test]
    fn overlapping_segments_both_returned() {
        let index = SegmentIndex::new(vec![seg("B", 500, 1500), seg("A", 0, 1000)]);
        let hits = index.covering(650);
        let speakers: Vec<&str> = hits.iter().map(|s| s.speaker_id.as_str()).collect();
        assert_eq!(speakers, vec!["A", "B"]);
    }

    #[test]
    fn boundary_points_are_inclusive() {
        let index = SegmentIndex::new(vec![seg("A", 100, 200)]);
        assert_eq!(index.covering(100).len(), 1);
        assert_eq!(index.covering(200).len(), 1);
        assert!(index.covering(99).is_empty());
        assert!(index.covering(201).is_empty());
    }

    #[test]
    fn zero_duration_segment_covers_its_point() {
        let index = SegmentIndex::new(vec![seg("A", 500, 500)]);
        assert_eq!(index.covering(500).len(), 1);
        assert!(index.covering(499).is_empty());
    }

    #[test]
    fn prefix_max_bridges_long_early_segment() {
        // A long early segment must still be found past many short ones.
        let mut segments = vec![seg("LONG", 0, 10_000)];
        for i in 0..20 {
            segments.push(seg("S", i * 100, i * 100 + 50));
        }
        let index = SegmentIndex::new(segments);
        let hits = index.covering(9_999);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].speaker_id.as_str(), "LONG");
    }
}
