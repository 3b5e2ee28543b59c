use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum trimmed idea length, in characters
    pub min_idea_len: usize,
    pub max_idea_len: usize,
    /// A refined idea must be strictly longer than this to replace the raw idea
    pub min_refined_len: usize,
    pub mvp_min_plan_steps: usize,
    pub production_min_plan_steps: usize,
    pub refine_timeout: Duration,
    pub domain_timeout: Duration,
    pub product_timeout: Duration,
    /// Permits in the advisory worker pool, shared by every request on the pipeline
    pub max_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_idea_len: 10,
            max_idea_len: 4000,
            min_refined_len: 30,
            mvp_min_plan_steps: 5,
            production_min_plan_steps: 10,
            refine_timeout: Duration::from_secs(20),
            domain_timeout: Duration::from_secs(45),
            product_timeout: Duration::from_secs(60),
            max_concurrency: 6,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_idea_len(mut self, min_idea_len: usize) -> Self {
        self.min_idea_len = min_idea_len;
        self
    }

    pub fn with_max_idea_len(mut self, max_idea_len: usize) -> Self {
        self.max_idea_len = max_idea_len;
        self
    }

    pub fn with_refine_timeout(mut self, timeout: Duration) -> Self {
        self.refine_timeout = timeout;
        self
    }

    pub fn with_domain_timeout(mut self, timeout: Duration) -> Self {
        self.domain_timeout = timeout;
        self
    }

    pub fn with_product_timeout(mut self, timeout: Duration) -> Self {
        self.product_timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_plan_thresholds(mut self, mvp: usize, production: usize) -> Self {
        self.mvp_min_plan_steps = mvp;
        self.production_min_plan_steps = production;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_idea_len, 10);
        assert_eq!(config.max_idea_len, 4000);
        assert_eq!(config.min_refined_len, 30);
        assert_eq!(config.mvp_min_plan_steps, 5);
        assert_eq!(config.production_min_plan_steps, 10);
        assert_eq!(config.domain_timeout, Duration::from_secs(45));
        assert_eq!(config.product_timeout, Duration::from_secs(60));
        assert_eq!(config.max_concurrency, 6);
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::new()
            .with_domain_timeout(Duration::from_millis(100))
            .with_product_timeout(Duration::from_millis(200))
            .with_max_concurrency(0)
            .with_plan_thresholds(3, 8);

        assert_eq!(config.domain_timeout, Duration::from_millis(100));
        assert_eq!(config.product_timeout, Duration::from_millis(200));
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.mvp_min_plan_steps, 3);
        assert_eq!(config.production_min_plan_steps, 8);
    }
}
