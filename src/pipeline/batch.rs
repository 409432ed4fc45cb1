//! Multi-page line resolution.

use rayon::prelude::*;

use super::result::PageLayout;
use super::strategy::{ClusterStrategy, Page};
use crate::core::config::ParallelPolicy;
use crate::core::errors::LayoutResult;

/// Resolves the lines of every page with one strategy.
///
/// Pages share no state, so batches larger than the policy's threshold are
/// spread over the rayon pool. Results keep the page order; the first error
/// encountered is returned.
pub fn resolve_pages(
    strategy: &dyn ClusterStrategy,
    pages: &[Page],
    policy: &ParallelPolicy,
) -> LayoutResult<Vec<PageLayout>> {
    if policy.should_parallelize(pages.len()) {
        tracing::debug!(pages = pages.len(), strategy = strategy.name(), "resolving pages in parallel");
        pages.par_iter().map(|page| strategy.layout(page)).collect()
    } else {
        pages.iter().map(|page| strategy.layout(page)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::strategy::{GeometricStrategy, MaskStrategy};
    use crate::processors::geometry::{PageShape, WordBox};

    fn page(rows: usize) -> Page {
        let boxes = (0..rows)
            .flat_map(|row| {
                let y = 10.0 + row as f32 * 50.0;
                [
                    WordBox::straight(100.0, y, 180.0, y + 30.0),
                    WordBox::straight(10.0, y, 90.0, y + 30.0),
                ]
            })
            .collect();
        Page::absolute(boxes, PageShape::new(400, 400))
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let pages: Vec<Page> = (1..=6).map(page).collect();
        let strategy = GeometricStrategy::default();
        let sequential = resolve_pages(&strategy, &pages, &ParallelPolicy::new().with_page_threshold(100)).unwrap();
        let parallel = resolve_pages(&strategy, &pages, &ParallelPolicy::new().with_page_threshold(0)).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[2].lines, vec![vec![1, 0], vec![3, 2], vec![5, 4]]);
    }

    #[test]
    fn test_every_page_is_partitioned() {
        let pages: Vec<Page> = (0..5).map(page).collect();
        let layouts = resolve_pages(&MaskStrategy::default(), &pages, &ParallelPolicy::default()).unwrap();
        for (page, layout) in pages.iter().zip(&layouts) {
            assert!(layout.is_partition_of(page.len()));
            assert_eq!(layout.line_count(), page.len() / 2);
        }
    }
}
