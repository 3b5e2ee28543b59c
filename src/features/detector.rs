//! Keyword-based feature detection
//!
//! Matching is a case-insensitive substring test against the table below. The input is
//! padded with a space on both sides, so keywords written with surrounding spaces
//! (`" ai "`, `" ml "`) only match as whole words, including at the start or end of the
//! text. Keywords without padding match anywhere, e.g. `"chat"` also matches `"chatbot"`.

use super::flag::{FeatureFlag, FeatureFlagSet};

/// Keyword phrases per flag, lower-case
pub const FEATURE_KEYWORDS: &[(FeatureFlag, &[&str])] = &[
    (
        FeatureFlag::Realtime,
        &[
            "realtime",
            "real-time",
            "chat",
            "live",
            "stream",
            "websocket",
            "live update",
            "collaborative",
            "multiplayer",
            "presence",
            "instant messaging",
            "socket",
        ],
    ),
    (
        FeatureFlag::Payments,
        &[
            "marketplace",
            "payments",
            "billing",
            "subscription",
            "checkout",
            "stripe",
            "pricing",
            "plan",
            "tier",
            "invoice",
            "e-commerce",
            "shopping cart",
            "order",
            "purchase",
            "monetization",
            "paywall",
        ],
    ),
    (
        FeatureFlag::Ai,
        &[
            "recommend",
            " ai ",
            "machine learning",
            " ml ",
            "llm",
            "assistant",
            "agent",
            "gpt",
            "claude",
            "embeddings",
            "vector",
            "rag",
            "chatbot",
            "generation",
            "prediction",
            "classification",
            "nlp",
            "sentiment",
            "ai-powered",
            "intelligent",
            "smart suggest",
        ],
    ),
    (
        FeatureFlag::Mobile,
        &[
            "mobile",
            "ios",
            "android",
            "push notification",
            "responsive",
            "pwa",
            "react native",
            "flutter",
            "native app",
            "app store",
        ],
    ),
    (
        FeatureFlag::Analytics,
        &[
            "analytics",
            "dashboard",
            "reporting",
            "metrics",
            "kpi",
            "visualization",
            "chart",
            "graph",
            "tracking",
            "insights",
            "data visualization",
        ],
    ),
    (
        FeatureFlag::FileUpload,
        &[
            "upload",
            "file",
            "image",
            "video",
            "media",
            "attachment",
            "storage",
            "s3",
            "cdn",
            "gallery",
            "document",
            "photo",
            "avatar",
            "asset",
        ],
    ),
    (
        FeatureFlag::Notifications,
        &[
            "notification",
            "email",
            "sms",
            "alert",
            "webhook",
            "in-app notification",
            "digest",
            "reminder",
            "push",
        ],
    ),
    (
        FeatureFlag::Search,
        &[
            "search",
            "filter",
            "facet",
            "elasticsearch",
            "full-text",
            "autocomplete",
            "typeahead",
            "fuzzy",
            "explore",
            "discover",
        ],
    ),
    (
        FeatureFlag::Social,
        &[
            "social",
            "profile",
            "follow",
            "feed",
            "comment",
            "like",
            "share",
            "community",
            "forum",
            "post",
            "thread",
            "reaction",
            "mention",
            "friend",
            "connection",
        ],
    ),
    (
        FeatureFlag::I18n,
        &[
            "i18n",
            "internationalization",
            "localization",
            "multi-language",
            "translation",
            "locale",
            "rtl",
            "multilingual",
        ],
    ),
    (
        FeatureFlag::MultiTenancy,
        &[
            "multi-tenant",
            "tenant",
            "organization",
            "workspace",
            "team",
            "saas",
            "white-label",
            "subdomain",
            "org",
        ],
    ),
    (
        FeatureFlag::Scheduling,
        &[
            "schedule",
            "calendar",
            "booking",
            "appointment",
            "cron",
            "recurring",
            "reminder",
            "event",
            "availability",
            "time slot",
        ],
    ),
    (
        FeatureFlag::AdminPanel,
        &[
            "admin",
            "backoffice",
            "cms",
            "content management",
            "moderation",
            "management panel",
            "back office",
            "internal tool",
        ],
    ),
    (
        FeatureFlag::AuthAdvanced,
        &[
            "sso",
            "oauth",
            "2fa",
            "mfa",
            "rbac",
            "role",
            "permission",
            "access control",
            "saml",
            "ldap",
            "single sign-on",
        ],
    ),
    (
        FeatureFlag::Geolocation,
        &[
            "map",
            "location",
            "geo",
            "gps",
            "address",
            "routing",
            "nearby",
            "distance",
            "place",
            "coordinate",
        ],
    ),
];

/// Returns every flag whose keyword list has at least one phrase present in `text`
pub fn detect(text: &str) -> FeatureFlagSet {
    let haystack = format!(" {} ", text.to_lowercase());

    FEATURE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(flag, _)| *flag)
        .collect()
}

/// Markdown bullet list describing `flags`, or a note that none were found
pub fn describe(flags: &FeatureFlagSet) -> String {
    if flags.is_empty() {
        return "No advanced features detected, standard CRUD application.".to_string();
    }

    flags
        .sorted()
        .iter()
        .map(|flag| format!("- **{}**: {}", flag, flag.description()))
        .collect::<Vec<_>>()
        .join("\n")
}
