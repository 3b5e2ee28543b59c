use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

crate::define_flag_enum! {
    /// A feature signal that can be detected in idea text
    FeatureFlag {
        Realtime => "realtime",
        Payments => "payments",
        Ai => "ai",
        Mobile => "mobile",
        Analytics => "analytics",
        FileUpload => "file_upload",
        Notifications => "notifications",
        Search => "search",
        Social => "social",
        I18n => "i18n",
        MultiTenancy => "multi_tenancy",
        Scheduling => "scheduling",
        AdminPanel => "admin_panel",
        AuthAdvanced => "auth_advanced",
        Geolocation => "geolocation",
    }
}

impl FeatureFlag {
    /// One-line capability summary used in advisory and procedural prompts
    pub fn description(&self) -> &'static str {
        match self {
            Self::Realtime => {
                "Real-time communication using WebSockets with presence tracking, live updates, and event broadcasting"
            }
            Self::Payments => {
                "Payment processing with Stripe integration, subscription management, invoicing, and checkout flows"
            }
            Self::Ai => {
                "AI/ML integration with LLM orchestration, prompt engineering, embeddings, and intelligent features"
            }
            Self::Mobile => {
                "Mobile-optimized API design with push notifications, offline-first patterns, and responsive interfaces"
            }
            Self::Analytics => {
                "Analytics dashboards with data visualization, KPI tracking, reporting, and user behavior insights"
            }
            Self::FileUpload => {
                "File upload system with cloud storage, image processing, CDN delivery, and media management"
            }
            Self::Notifications => {
                "Multi-channel notification system with email, SMS, in-app alerts, and webhook integrations"
            }
            Self::Search => {
                "Full-text search with faceted filtering, autocomplete, relevance tuning, and indexing"
            }
            Self::Social => {
                "Social features including user profiles, feeds, comments, reactions, follows, and community interaction"
            }
            Self::I18n => {
                "Internationalization with multi-language support, locale management, RTL layout, and translation workflows"
            }
            Self::MultiTenancy => {
                "Multi-tenant architecture with organization/workspace isolation, tenant-scoped data, and SaaS billing"
            }
            Self::Scheduling => {
                "Scheduling system with calendar views, booking flows, availability management, and recurring events"
            }
            Self::AdminPanel => {
                "Admin panel with content management, moderation tools, user management, and internal dashboards"
            }
            Self::AuthAdvanced => {
                "Advanced authentication with SSO, MFA/2FA, role-based access control (RBAC), and fine-grained permissions"
            }
            Self::Geolocation => {
                "Geolocation features with maps, address lookup, proximity search, routing, and location-based services"
            }
        }
    }
}

/// Membership-only set of detected flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlagSet(BTreeSet<FeatureFlag>);

impl FeatureFlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flag: FeatureFlag) -> bool {
        self.0.insert(flag)
    }

    pub fn contains(&self, flag: FeatureFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FeatureFlag> + '_ {
        self.0.iter().copied()
    }

    pub fn union(&self, other: &FeatureFlagSet) -> FeatureFlagSet {
        FeatureFlagSet(self.0.union(&other.0).copied().collect())
    }

    /// Flag names in lexicographic order, the form exposed in generation results
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.iter().map(|f| f.as_str().to_string()).collect();
        names.sort();
        names
    }

    /// Flags ordered by name, for deterministic rendering
    pub fn sorted(&self) -> Vec<FeatureFlag> {
        let mut flags: Vec<FeatureFlag> = self.0.iter().copied().collect();
        flags.sort_by_key(|f| f.as_str());
        flags
    }
}

impl FromIterator<FeatureFlag> for FeatureFlagSet {
    fn from_iter<I: IntoIterator<Item = FeatureFlag>>(iter: I) -> Self {
        FeatureFlagSet(iter.into_iter().collect())
    }
}
