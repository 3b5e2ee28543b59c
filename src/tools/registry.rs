use super::profile::{PromptStyle, ToolKind, ToolProfile};
use crate::stack::StackChoice;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Read-only table of tool profiles keyed by identifier
#[derive(Debug, Clone)]
pub struct ToolProfileRegistry {
    profiles: HashMap<&'static str, Arc<ToolProfile>>,
}

impl ToolProfileRegistry {
    pub fn new(profiles: impl IntoIterator<Item = ToolProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.identifier(), Arc::new(p)))
                .collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new([lovable(), replit(), base44(), claude_code()])
    }

    /// Looks up `identifier`; absent or unknown identifiers resolve to `None`
    pub fn resolve(&self, identifier: Option<&str>) -> Option<Arc<ToolProfile>> {
        let id = identifier.map(str::trim).filter(|id| !id.is_empty())?;
        let profile = self.profiles.get(id).cloned();
        if profile.is_none() {
            debug!(tool = id, "Unknown tool identifier, using default generation");
        }
        profile
    }

    /// Profiles ordered by identifier
    pub fn list(&self) -> Vec<Arc<ToolProfile>> {
        let mut all: Vec<Arc<ToolProfile>> = self.profiles.values().cloned().collect();
        all.sort_by_key(|p| p.identifier());
        all
    }
}

impl Default for ToolProfileRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn lovable() -> ToolProfile {
    ToolProfile {
        kind: ToolKind::Lovable,
        name: "Lovable".to_string(),
        description: "React + Vite + Tailwind + Supabase".to_string(),
        stack: Some(StackChoice {
            frontend: "React 18 + Vite 5 + Tailwind CSS 3".to_string(),
            frontend_ui: "shadcn/ui + Radix primitives".to_string(),
            backend: "Supabase Edge Functions (Deno/TypeScript)".to_string(),
            database: "Supabase PostgreSQL (with Row-Level Security)".to_string(),
            cache: "None".to_string(),
            infra: "Lovable hosting (auto-deployed)".to_string(),
            auth: "Supabase Auth (email/password + OAuth)".to_string(),
            ai: "OpenAI GPT-4.1 (via Supabase Edge Function)".to_string(),
            search: "None".to_string(),
            file_storage: "Supabase Storage".to_string(),
            email: "Supabase Edge Function + Resend".to_string(),
            monitoring: "Sentry (frontend only)".to_string(),
            testing: "Vitest + React Testing Library".to_string(),
        }),
        prompt_style: PromptStyle::Descriptive,
        has_own_deployment: true,
        has_own_auth: true,
    }
}

fn replit() -> ToolProfile {
    ToolProfile {
        kind: ToolKind::Replit,
        name: "Replit Agent".to_string(),
        description: "React + Node.js/Express + PostgreSQL".to_string(),
        stack: Some(StackChoice {
            frontend: "React 18 + Vite 5 + Tailwind CSS 3".to_string(),
            frontend_ui: "shadcn/ui + Radix primitives".to_string(),
            backend: "Node.js 20 + Express 4".to_string(),
            database: "PostgreSQL 16 + Prisma ORM".to_string(),
            cache: "None".to_string(),
            infra: "Replit Deployments (auto-hosted)".to_string(),
            auth: "Express sessions + bcrypt + JWT".to_string(),
            ai: "OpenAI GPT-4.1 (via openai npm package)".to_string(),
            search: "None".to_string(),
            file_storage: "Replit Object Storage".to_string(),
            email: "Resend (npm package)".to_string(),
            monitoring: "Console logging + Sentry".to_string(),
            testing: "Jest + Supertest (backend) · Vitest + RTL (frontend)".to_string(),
        }),
        prompt_style: PromptStyle::Conversational,
        has_own_deployment: true,
        has_own_auth: false,
    }
}

fn base44() -> ToolProfile {
    ToolProfile {
        kind: ToolKind::Base44,
        name: "Base44".to_string(),
        description: "No-code data-first AI app builder".to_string(),
        stack: Some(StackChoice {
            frontend: "Base44 auto-generated UI".to_string(),
            frontend_ui: "Base44 built-in components".to_string(),
            backend: "Base44 platform (managed)".to_string(),
            database: "Base44 built-in database".to_string(),
            cache: "None".to_string(),
            infra: "Base44 hosting (managed)".to_string(),
            auth: "Base44 built-in auth".to_string(),
            ai: "Base44 AI (Claude Sonnet 4 / Gemini 2.5 Pro)".to_string(),
            search: "Base44 built-in search".to_string(),
            file_storage: "Base44 file storage".to_string(),
            email: "Base44 integrations (SendGrid / Resend)".to_string(),
            monitoring: "Base44 dashboard".to_string(),
            testing: "Manual testing via Base44 preview".to_string(),
        }),
        prompt_style: PromptStyle::EntityFocused,
        has_own_deployment: true,
        has_own_auth: true,
    }
}

fn claude_code() -> ToolProfile {
    ToolProfile {
        kind: ToolKind::ClaudeCode,
        name: "Claude Code".to_string(),
        description: "FastAPI + Next.js (full code generation)".to_string(),
        stack: None,
        prompt_style: PromptStyle::DetailedCode,
        has_own_deployment: false,
        has_own_auth: false,
    }
}
