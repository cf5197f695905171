//! Bounding batches to a maximum request size.

use crate::models::Batch;

/// Split `batch` into contiguous slices of at most `max_chunks` chunks.
///
/// A batch that already fits is returned unchanged as the only element.
/// Every slice keeps the namespace and document id of the source batch.
/// A `max_chunks` of zero is treated as one.
pub fn split_batch(batch: &Batch, max_chunks: usize) -> Vec<Batch> {
    let max_chunks = max_chunks.max(1);
    if batch.len() <= max_chunks {
        return vec![batch.clone()];
    }

    batch
        .chunks
        .chunks(max_chunks)
        .map(|slice| Batch {
            namespace: batch.namespace.clone(),
            doc_id: batch.doc_id.clone(),
            chunks: slice.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Chunk;
    use serde_json::Map;

    fn batch_of(n: usize) -> Batch {
        let mut batch = Batch::new("ns", "D");
        batch.chunks = (0..n)
            .map(|i| Chunk {
                id: format!("D#{i}"),
                text: format!("chunk {i}"),
                meta: Map::new(),
            })
            .collect();
        batch
    }

    #[test]
    fn test_small_batch_is_unchanged() {
        let batch = batch_of(3);
        let parts = split_batch(&batch, 3);
        assert_eq!(parts, vec![batch]);
    }

    #[test]
    fn test_seven_chunks_by_three() {
        let batch = batch_of(7);
        let parts = split_batch(&batch, 3);

        let sizes: Vec<usize> = parts.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        for part in &parts {
            assert_eq!(part.namespace, "ns");
            assert_eq!(part.doc_id, "D");
        }
    }

    #[test]
    fn test_split_reconstructs_original_order() {
        for n in [1usize, 2, 5, 10, 11] {
            for k in [1usize, 2, 3, 4, 10] {
                let batch = batch_of(n);
                let parts = split_batch(&batch, k);
                assert_eq!(parts.len(), n.div_ceil(k));
                assert!(parts.iter().all(|p| p.len() <= k));

                let rejoined: Vec<Chunk> = parts.into_iter().flat_map(|p| p.chunks).collect();
                assert_eq!(rejoined, batch.chunks);
            }
        }
    }

    #[test]
    fn test_zero_limit_is_treated_as_one() {
        let parts = split_batch(&batch_of(2), 0);
        assert_eq!(parts.len(), 2);
    }
}
