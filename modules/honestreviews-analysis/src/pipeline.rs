use std::sync::Arc;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use honestreviews_common::{AnalysisError, AnalysisReport, Category};

use crate::collector::DiscussionCollector;
use crate::traits::{DiscussionSource, VerdictModel};
use crate::verdict::VerdictGenerator;

/// One analysis request as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub product_name: Option<String>,
    pub category: Option<String>,
}

impl AnalysisRequest {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: Some(product_name.into()),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Collect, then judge. Shared across requests; holds no per-request state.
pub struct Analyzer {
    collector: DiscussionCollector,
    generator: VerdictGenerator,
}

impl Analyzer {
    pub fn new(collector: DiscussionCollector, generator: VerdictGenerator) -> Self {
        Self {
            collector,
            generator,
        }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        let product = request
            .product_name
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(AnalysisError::MissingProductName)?
            .to_string();
        let category = Category::parse_optional(request.category.as_deref());

        let span = info_span!(
            "analysis",
            analysis_id = %Uuid::new_v4(),
            product = %product,
        );

        self.run(product, category).instrument(span).await
    }

    async fn run(
        &self,
        product: String,
        category: Option<Category>,
    ) -> Result<AnalysisReport, AnalysisError> {
        info!(category = ?category, "Analysis requested");

        let discussions = self.collector.collect(&product).await?;
        let analysis = self.generator.generate(&discussions.text_blob).await?;

        info!(
            sources = discussions.sources.len(),
            score = analysis.sentiment_score,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            product,
            category,
            analysis,
            sources: discussions.sources,
        })
    }
}

/// Convenience for wiring trait objects directly.
pub fn analyzer(
    source: Arc<dyn DiscussionSource>,
    model: Arc<dyn VerdictModel>,
) -> Analyzer {
    Analyzer::new(DiscussionCollector::new(source), VerdictGenerator::new(model))
}
