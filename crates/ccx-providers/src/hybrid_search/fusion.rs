//! Backend-agnostic rank fusion
//!
//! Fuses independently executed retrieval legs into one ranking. Documents
//! are keyed by id; ties always break by first-leg rank so fused orderings
//! are deterministic.

use ccx_domain::constants::RRF_ABSENT_RANK;
use ccx_domain::value_objects::ScoredDocument;
use std::collections::HashMap;

/// Reciprocal rank fusion: `score(d) = sum over legs of 1 / (k + rank)`.
///
/// `rank` is 1-based within each leg; documents absent from a leg
/// contribute the sentinel rank instead.
pub fn rrf_fuse(legs: &[Vec<ScoredDocument>], k: f64, top_k: usize) -> Vec<ScoredDocument> {
    fuse(legs, top_k, |rank_maps, id| {
        rank_maps
            .iter()
            .map(|ranks| {
                let rank = ranks.get(id).copied().unwrap_or(RRF_ABSENT_RANK);
                1.0 / (k + rank as f64)
            })
            .sum()
    })
}

/// Weighted fusion: `score(d) = sum over legs of w_leg * normalized_score`.
///
/// Per-leg scores are min-max normalized to `[0, 1]`; absent documents
/// contribute nothing for that leg. Legs beyond `weights.len()` get weight
/// zero.
pub fn weighted_fuse(
    legs: &[Vec<ScoredDocument>],
    weights: &[f64],
    top_k: usize,
) -> Vec<ScoredDocument> {
    let normalized: Vec<HashMap<&str, f64>> = legs.iter().map(|leg| normalize_leg(leg)).collect();

    fuse(legs, top_k, |_, id| {
        normalized
            .iter()
            .zip(weights.iter().chain(std::iter::repeat(&0.0)))
            .map(|(scores, weight)| weight * scores.get(id).copied().unwrap_or(0.0))
            .sum()
    })
}

/// Shared fusion skeleton: build rank maps, score the union of documents,
/// sort by fused score with first-leg-rank tie-break, truncate.
fn fuse<F>(legs: &[Vec<ScoredDocument>], top_k: usize, score_of: F) -> Vec<ScoredDocument>
where
    F: Fn(&[HashMap<&str, usize>], &str) -> f64,
{
    if top_k == 0 || legs.is_empty() {
        return Vec::new();
    }

    let rank_maps: Vec<HashMap<&str, usize>> = legs
        .iter()
        .map(|leg| {
            leg.iter()
                .enumerate()
                .map(|(idx, hit)| (hit.document.id.as_str(), idx + 1))
                .collect()
        })
        .collect();

    // Union of documents, first occurrence wins; leg order preserves the
    // first leg's ranking as iteration base.
    let mut order: Vec<&str> = Vec::new();
    let mut by_id: HashMap<&str, &ScoredDocument> = HashMap::new();
    for leg in legs {
        for hit in leg {
            if !by_id.contains_key(hit.document.id.as_str()) {
                by_id.insert(&hit.document.id, hit);
                order.push(&hit.document.id);
            }
        }
    }

    let first_leg_rank = |id: &str| rank_maps[0].get(id).copied().unwrap_or(RRF_ABSENT_RANK);

    let mut fused: Vec<(f64, usize, &ScoredDocument)> = order
        .iter()
        .map(|id| (score_of(&rank_maps, id), first_leg_rank(id), by_id[id]))
        .collect();

    fused.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    fused
        .into_iter()
        .take(top_k)
        .map(|(score, _, hit)| ScoredDocument {
            document: hit.document.clone(),
            score,
        })
        .collect()
}

/// Min-max normalize one leg's scores into `[0, 1]`
fn normalize_leg(leg: &[ScoredDocument]) -> HashMap<&str, f64> {
    let min = leg.iter().map(|h| h.score).fold(f64::INFINITY, f64::min);
    let max = leg.iter().map(|h| h.score).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    leg.iter()
        .map(|hit| {
            let normalized = if range > 0.0 {
                (hit.score - min) / range
            } else {
                1.0
            };
            (hit.document.id.as_str(), normalized)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccx_domain::entities::VectorDocument;
    use std::collections::HashMap as Map;

    fn doc(id: &str) -> VectorDocument {
        VectorDocument {
            id: id.to_string(),
            vector: vec![0.0],
            content: format!("content of {id}"),
            relative_path: format!("{id}.rs"),
            start_line: 1,
            end_line: 1,
            file_extension: ".rs".to_string(),
            metadata: Map::new(),
        }
    }

    fn leg(ids_scores: &[(&str, f64)]) -> Vec<ScoredDocument> {
        ids_scores
            .iter()
            .map(|(id, score)| ScoredDocument {
                document: doc(id),
                score: *score,
            })
            .collect()
    }

    #[test]
    fn rrf_matches_reference_scores() {
        // Dense ranks d1, d2, d3; sparse ranks d3, d1, d2; k = 60.
        let dense = leg(&[("d1", 0.9), ("d2", 0.8), ("d3", 0.7)]);
        let sparse = leg(&[("d3", 5.0), ("d1", 4.0), ("d2", 3.0)]);

        let fused = rrf_fuse(&[dense, sparse], 60.0, 10);
        let ids: Vec<&str> = fused.iter().map(|h| h.document.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d3", "d2"]);

        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        assert!(close(fused[0].score, 1.0 / 61.0 + 1.0 / 62.0));
        assert!(close(fused[1].score, 1.0 / 63.0 + 1.0 / 61.0));
        assert!(close(fused[2].score, 1.0 / 62.0 + 1.0 / 63.0));
    }

    #[test]
    fn rrf_absent_documents_use_sentinel_rank() {
        let dense = leg(&[("a", 0.9), ("b", 0.8)]);
        let sparse = leg(&[("c", 2.0)]);

        let fused = rrf_fuse(&[dense, sparse], 60.0, 10);
        assert_eq!(fused.len(), 3);
        // `a` appears first in the first leg and wins over the sparse-only `c`.
        assert_eq!(fused[0].document.id, "a");

        let c = fused.iter().find(|h| h.document.id == "c").unwrap();
        let expected = 1.0 / (60.0 + RRF_ABSENT_RANK as f64) + 1.0 / 61.0;
        assert!((c.score - expected).abs() < 1e-12);
    }

    #[test]
    fn rrf_ties_break_by_first_leg_rank() {
        // Symmetric legs make every fused score equal.
        let dense = leg(&[("a", 0.9), ("b", 0.8)]);
        let sparse = leg(&[("b", 2.0), ("a", 1.0)]);

        let fused = rrf_fuse(&[dense, sparse], 60.0, 2);
        assert_eq!(fused[0].document.id, "a");
        assert_eq!(fused[1].document.id, "b");
    }

    #[test]
    fn rrf_truncates_to_top_k() {
        let dense = leg(&[("a", 0.9), ("b", 0.8), ("c", 0.7)]);
        let fused = rrf_fuse(&[dense], 60.0, 2);
        assert_eq!(fused.len(), 2);
        assert!(rrf_fuse(&[leg(&[("a", 0.9)])], 60.0, 0).is_empty());
    }

    #[test]
    fn weighted_fusion_respects_weights() {
        let dense = leg(&[("a", 1.0), ("b", 0.0)]);
        let sparse = leg(&[("b", 9.0), ("a", 1.0)]);

        // All weight on the sparse leg: b must win.
        let fused = weighted_fuse(&[dense, sparse], &[0.0, 1.0], 2);
        assert_eq!(fused[0].document.id, "b");
        assert!((fused[0].score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_fusion_normalizes_each_leg() {
        // Raw sparse scores dwarf dense ones; normalization keeps both
        // legs comparable, so the document ranked first in both wins.
        let dense = leg(&[("a", 0.9), ("b", 0.1)]);
        let sparse = leg(&[("a", 1000.0), ("b", 1.0)]);

        let fused = weighted_fuse(&[dense, sparse], &[0.5, 0.5], 2);
        assert_eq!(fused[0].document.id, "a");
        assert!((fused[0].score - 1.0).abs() < 1e-12);
    }
}
