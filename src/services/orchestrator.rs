use futures::future::join_all;
use tracing::{info, warn};

use crate::models::catalog::{CatalogItem, MatchResult};
use crate::services::caption::{CaptionError, CaptionProvider};
use crate::services::comparison::ComparisonProvider;
use crate::services::similarity::{SimilarityError, SimilarityProvider};

/// Fatal errors for the upload pipeline.
///
/// Only the two required stages can fail the pipeline; per-item comparison
/// failures are absorbed and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("caption stage failed: {0}")]
    Caption(#[from] CaptionError),

    #[error("similarity-search stage failed: {0}")]
    Search(#[from] SimilarityError),
}

/// Output of a successful pipeline run.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub caption: String,
    pub matches: Vec<MatchResult>,
}

/// Three-stage upload pipeline: caption, similarity search, per-item
/// comparison fan-out.
pub struct UploadOrchestrator<C, S, P> {
    caption: C,
    similarity: S,
    comparison: P,
}

impl<C, S, P> UploadOrchestrator<C, S, P>
where
    C: CaptionProvider,
    S: SimilarityProvider,
    P: ComparisonProvider,
{
    pub fn new(caption: C, similarity: S, comparison: P) -> Self {
        Self {
            caption,
            similarity,
            comparison,
        }
    }

    /// Run the full pipeline for one uploaded image (base64-encoded).
    ///
    /// The output list preserves the similarity response's item count and
    /// order regardless of comparison completion order.
    pub async fn process(&self, base64_image: &str) -> Result<AnalysisOutcome, PipelineError> {
        let caption = self.caption.caption(base64_image).await?;
        info!(caption = %caption, "caption generated");

        let items = self.similarity.search(&caption).await?;
        info!(count = items.len(), "similarity search returned candidates");

        let matches = self.compare_all(base64_image, items).await;
        Ok(AnalysisOutcome { caption, matches })
    }

    /// Stage 3: one independent comparison task per item with an image URL.
    ///
    /// `join_all` keeps input order; each task writes only its own slot, so no
    /// coordination beyond awaiting the set is needed.
    async fn compare_all(&self, base64_image: &str, items: Vec<CatalogItem>) -> Vec<MatchResult> {
        let tasks = items.into_iter().map(|item| async move {
            let image_url = match item.image_url.clone() {
                Some(url) => url,
                None => return MatchResult::plain(item),
            };

            match self.comparison.compare(base64_image, &image_url).await {
                Ok(outcome) => MatchResult::enriched(item, outcome),
                Err(e) => {
                    metrics::counter!("comparisons_failed_total").increment(1);
                    warn!(image_url = %image_url, error = %e, "comparison failed, keeping plain item");
                    MatchResult::plain(item)
                }
            }
        });

        join_all(tasks).await
    }
}
