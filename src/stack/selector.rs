//! Flag-driven technology selection
//!
//! Each slot has its own rule function reading only the flag set, so rules never
//! interact. No clock, randomness, or shared state is consulted.

use super::choice::{StackChoice, NONE_SLOT};
use crate::features::{FeatureFlag, FeatureFlagSet};

/// Returns a fully populated stack for `flags`
pub fn choose(flags: &FeatureFlagSet) -> StackChoice {
    StackChoice {
        frontend: frontend(flags),
        frontend_ui: "shadcn/ui + Radix primitives".to_string(),
        backend: "FastAPI 0.115 + Uvicorn (Python 3.11+)".to_string(),
        database: database(flags),
        cache: cache(flags),
        infra: infra(flags),
        auth: auth(flags),
        ai: ai(flags),
        search: search(flags),
        file_storage: file_storage(flags),
        email: email(flags),
        monitoring: monitoring(flags),
        testing: "pytest + httpx (backend) · Playwright (E2E) · Jest + React Testing Library (frontend)"
            .to_string(),
    }
}

fn frontend(flags: &FeatureFlagSet) -> String {
    let mut value = "Next.js 14 (App Router) + Tailwind CSS 3".to_string();
    if flags.contains(FeatureFlag::Mobile) {
        value.push_str(" (+ React Native for mobile)");
    }
    value
}

fn database(flags: &FeatureFlagSet) -> String {
    let mut value = "PostgreSQL 16 + SQLAlchemy 2.0 (async) + Alembic".to_string();
    if flags.contains(FeatureFlag::Ai) {
        value.push_str(" + pgvector");
    }
    if flags.contains(FeatureFlag::Analytics) {
        value.push_str(" + TimescaleDB");
    }
    value
}

fn cache(flags: &FeatureFlagSet) -> String {
    if flags.contains(FeatureFlag::Realtime) || flags.contains(FeatureFlag::Scheduling) {
        "Redis 7 (pub/sub + caching)".to_string()
    } else if flags.len() >= 3 {
        "Redis 7 (caching layer)".to_string()
    } else {
        NONE_SLOT.to_string()
    }
}

fn search(flags: &FeatureFlagSet) -> String {
    if !flags.contains(FeatureFlag::Search) {
        return NONE_SLOT.to_string();
    }
    if flags.contains(FeatureFlag::Analytics) || flags.len() >= 6 {
        "Elasticsearch 8 (advanced search + analytics)".to_string()
    } else {
        "Meilisearch (lightweight full-text search)".to_string()
    }
}

fn file_storage(flags: &FeatureFlagSet) -> String {
    if flags.contains(FeatureFlag::FileUpload) {
        "AWS S3 (via boto3) + CloudFront CDN".to_string()
    } else if flags.contains(FeatureFlag::Social) {
        "Cloudflare R2 (avatars + media)".to_string()
    } else {
        NONE_SLOT.to_string()
    }
}

fn email(flags: &FeatureFlagSet) -> String {
    let needs_email = [
        FeatureFlag::Notifications,
        FeatureFlag::Payments,
        FeatureFlag::AuthAdvanced,
        FeatureFlag::Scheduling,
    ]
    .into_iter()
    .any(|flag| flags.contains(flag));

    if needs_email {
        "Resend (transactional email)".to_string()
    } else {
        NONE_SLOT.to_string()
    }
}

fn infra(flags: &FeatureFlagSet) -> String {
    if flags.contains(FeatureFlag::Realtime) {
        "Docker + Render (persistent WebSocket support)".to_string()
    } else if flags.len() >= 5 {
        "Docker + AWS ECS (scalable)".to_string()
    } else {
        "Docker + Fly.io (simple deploy)".to_string()
    }
}

fn auth(flags: &FeatureFlagSet) -> String {
    if flags.contains(FeatureFlag::AuthAdvanced) {
        "Auth.js (NextAuth) + custom RBAC middleware".to_string()
    } else if flags.contains(FeatureFlag::Payments) || flags.contains(FeatureFlag::MultiTenancy) {
        "Auth.js (NextAuth) with JWT sessions".to_string()
    } else {
        "Clerk (managed auth)".to_string()
    }
}

fn ai(flags: &FeatureFlagSet) -> String {
    if flags.contains(FeatureFlag::Ai) {
        "OpenAI GPT-4.1 + Embeddings API + LangChain".to_string()
    } else {
        "OpenAI GPT-4.1 (via openai SDK)".to_string()
    }
}

fn monitoring(flags: &FeatureFlagSet) -> String {
    if flags.contains(FeatureFlag::Analytics) || flags.len() >= 5 {
        "Sentry (errors) + Prometheus + Grafana + structlog".to_string()
    } else {
        "Sentry (errors) + Structured logging (structlog)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(flags: &[FeatureFlag]) -> FeatureFlagSet {
        flags.iter().copied().collect()
    }

    #[test]
    fn test_empty_flags_baseline() {
        let stack = choose(&FeatureFlagSet::new());
        assert_eq!(stack.cache, NONE_SLOT);
        assert_eq!(stack.search, NONE_SLOT);
        assert_eq!(stack.file_storage, NONE_SLOT);
        assert_eq!(stack.email, NONE_SLOT);
        assert_eq!(stack.auth, "Clerk (managed auth)");
        assert_eq!(stack.infra, "Docker + Fly.io (simple deploy)");
    }

    #[test]
    fn test_realtime_selects_pubsub_cache_and_render() {
        let stack = choose(&set(&[FeatureFlag::Realtime]));
        assert_eq!(stack.cache, "Redis 7 (pub/sub + caching)");
        assert!(stack.infra.contains("Render"));
    }

    #[test]
    fn test_cache_from_cardinality() {
        let stack = choose(&set(&[
            FeatureFlag::Payments,
            FeatureFlag::Search,
            FeatureFlag::Social,
        ]));
        assert_eq!(stack.cache, "Redis 7 (caching layer)");
    }

    #[test]
    fn test_search_tiers() {
        let light = choose(&set(&[FeatureFlag::Search]));
        assert!(light.search.starts_with("Meilisearch"));

        let heavy = choose(&set(&[FeatureFlag::Search, FeatureFlag::Analytics]));
        assert!(heavy.search.starts_with("Elasticsearch"));
    }

    #[test]
    fn test_database_extensions() {
        let stack = choose(&set(&[FeatureFlag::Ai, FeatureFlag::Analytics]));
        assert!(stack.database.ends_with("+ pgvector + TimescaleDB"));
    }

    #[test]
    fn test_file_storage_prefers_upload_over_social() {
        let stack = choose(&set(&[FeatureFlag::FileUpload, FeatureFlag::Social]));
        assert!(stack.file_storage.starts_with("AWS S3"));

        let social = choose(&set(&[FeatureFlag::Social]));
        assert!(social.file_storage.starts_with("Cloudflare R2"));
    }

    #[test]
    fn test_auth_precedence() {
        let stack = choose(&set(&[FeatureFlag::AuthAdvanced, FeatureFlag::Payments]));
        assert!(stack.auth.contains("RBAC"));

        let tenant = choose(&set(&[FeatureFlag::MultiTenancy]));
        assert!(tenant.auth.contains("JWT sessions"));
    }

    #[test]
    fn test_mobile_frontend() {
        let stack = choose(&set(&[FeatureFlag::Mobile]));
        assert!(stack.frontend.contains("React Native"));
    }

    #[test]
    fn test_choose_is_pure() {
        let flags = set(&[
            FeatureFlag::Realtime,
            FeatureFlag::Ai,
            FeatureFlag::Search,
            FeatureFlag::Geolocation,
        ]);
        let first = serde_json::to_string(&choose(&flags)).unwrap();
        let second = serde_json::to_string(&choose(&flags)).unwrap();
        assert_eq!(first, second);
    }
}
