//! Prompt packs tailored to a specific code-generation tool

use super::blocks::{
    constraints_section, endpoints_block, entities_block, pages_block, stack_block,
    workflows_block, QUALITY_FOOTER,
};
use super::prompts::PromptPack;
use super::ProceduralInput;
use crate::features::FeatureFlag;

fn scope(input: &ProceduralInput<'_>) -> &'static str {
    if input.mode.is_mvp() {
        "MVP"
    } else {
        "production-ready"
    }
}

fn target_bold(input: &ProceduralInput<'_>) -> String {
    input
        .target_users
        .map(|users| format!("**Target Users:** {}\n", users))
        .unwrap_or_default()
}

/// `"## heading"` followed by one bullet per detected flag in `notes`, or nothing
fn feature_section(input: &ProceduralInput<'_>, heading: &str, notes: &[(FeatureFlag, &str)]) -> String {
    let lines: Vec<String> = notes
        .iter()
        .filter(|(flag, _)| input.flags.contains(*flag))
        .map(|(_, note)| format!("- {}", note))
        .collect();
    if lines.is_empty() {
        String::new()
    } else {
        format!("\n## {}\n{}\n", heading, lines.join("\n"))
    }
}

pub fn lovable(input: &ProceduralInput<'_>) -> PromptPack {
    let mut pack = PromptPack::new();
    pack.insert("master_prompt".into(), lovable_master(input));
    pack.insert("frontend_code".into(), lovable_frontend(input));
    pack.insert("database_schema".into(), lovable_database(input));
    pack
}

fn lovable_master(input: &ProceduralInput<'_>) -> String {
    let lean = input.mode.is_mvp();
    let pages = pages_block(input.domain);
    let features = feature_section(
        input,
        "Feature-Specific Requirements",
        &[
            (FeatureFlag::Realtime, "Enable Supabase Realtime on relevant tables for live updates."),
            (FeatureFlag::Payments, "Integrate Stripe via a Supabase Edge Function (webhook handler + checkout session)."),
            (FeatureFlag::Ai, "Call the OpenAI API from a Supabase Edge Function and stream responses via SSE."),
            (FeatureFlag::FileUpload, "Use Supabase Storage for file uploads with RLS policies on buckets."),
            (FeatureFlag::Search, "Use PostgreSQL full-text search (tsvector) for search."),
        ],
    );
    format!(
        r#"Build a **complete, {scope}** web application using **Lovable** (lovable.dev).
Lovable generates React + Vite + Tailwind CSS apps with Supabase as the backend.
Describe EVERYTHING the app needs so Lovable can build it in one shot.

## Project Description
{idea}
{target}
## Tech Stack (Lovable's stack)
{stack}
{entities}
{pages}
{workflows}

## Supabase Database Design
Define ALL tables with typed columns, keys and relationships, Row-Level Security policies
for every operation, and Realtime on tables that need live updates.
{endpoints}

## Authentication
- Supabase Auth with email/password sign-up; protected routes redirect to login.

## Frontend Pages & Components
{page_hint}
Each page needs loading, error and empty states, a mobile-first layout, and validated forms.
{features}
## Important Lovable Conventions
- Do NOT generate a separate backend server; Supabase handles backend logic.
- Use `@supabase/supabase-js` for all data operations and Edge Functions for server-side logic.
- Never disable RLS.
- {closing}"#,
        scope = scope(input),
        idea = input.idea,
        target = target_bold(input),
        stack = stack_block(input.stack, Some(&["frontend", "frontend_ui", "backend", "database", "auth", "infra"])),
        entities = entities_block(input.domain),
        page_hint = if pages.is_empty() {
            "Build pages for every core workflow."
        } else {
            "Build all pages listed above."
        },
        pages = pages,
        workflows = workflows_block(input.domain),
        endpoints = if lean { String::new() } else { endpoints_block(input.domain) },
        features = features,
        closing = if lean {
            "Keep it lean: only essential features for the MVP."
        } else {
            "Build for production: proper error handling, loading states, and edge cases."
        },
    )
}

fn lovable_frontend(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are building the React frontend for a Lovable app.
Describe the **complete component and page structure**.

## App Idea
{idea}
{target}
## Tech Stack
{stack}
- react-hook-form + zod for forms, React Router for navigation
{pages}
{workflows}

## Page Structure
For each page: route, the Supabase query it displays, user interactions, and its loading,
error and empty states.

## Authentication Flow
- signInWithPassword on login, signUp with email confirmation on register, signOut on logout.
- An AuthGuard component wraps protected routes.

## Data Fetching
- `.from('table').select()` for reads, `.insert()` / `.update()` / `.delete()` for writes.
- Realtime subscriptions where needed, optimistic updates for better UX.
{footer}"#,
        idea = input.idea,
        target = target_bold(input),
        stack = stack_block(input.stack, Some(&["frontend", "frontend_ui"])),
        pages = pages_block(input.domain),
        workflows = workflows_block(input.domain),
        footer = QUALITY_FOOTER,
    )
}

fn lovable_database(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are designing the Supabase PostgreSQL database for a Lovable app.
Produce **COMPLETE SQL** for all tables, RLS policies, and triggers.

## App Idea
{idea}
{entities}

## Requirements
1. **Tables**: `uuid` keys with `gen_random_uuid()`, timestamps, foreign keys, and indexes.
2. **Row-Level Security**: enable RLS on EVERY table with SELECT, INSERT, UPDATE and DELETE
   policies keyed on `auth.uid()`.
3. **Auth Integration**: a profiles table populated by a trigger on `auth.users`.
4. **Realtime**: `ALTER PUBLICATION supabase_realtime ADD TABLE ...;` where live updates are needed.

Output complete SQL that can be pasted into the Supabase SQL Editor.
{footer}"#,
        idea = input.idea,
        entities = entities_block(input.domain),
        footer = QUALITY_FOOTER,
    )
}

pub fn replit(input: &ProceduralInput<'_>) -> PromptPack {
    let mut pack = PromptPack::new();
    pack.insert("master_prompt".into(), replit_master(input));
    pack.insert("backend_code".into(), replit_backend(input));
    pack.insert("frontend_code".into(), replit_frontend(input));
    pack.insert("database_schema".into(), replit_database(input));
    pack
}

fn replit_master(input: &ProceduralInput<'_>) -> String {
    let features = feature_section(
        input,
        "Feature-Specific",
        &[
            (FeatureFlag::Realtime, "Use Socket.io for real-time features (Express + React)."),
            (FeatureFlag::Payments, "Integrate Stripe: checkout sessions, webhook handler, billing portal."),
            (FeatureFlag::Ai, "Use the OpenAI npm package for AI features and stream responses via SSE."),
            (FeatureFlag::FileUpload, "Use multer for file uploads and store them in Replit Object Storage."),
        ],
    );
    format!(
        r#"Build a **complete, {scope}** full-stack web application using **Replit Agent**.
Replit uses React for the frontend and Node.js + Express for the backend with PostgreSQL.

## Project Description
{idea}
{target}
## Tech Stack (Replit's stack)
{stack}
{entities}
{endpoints}
{pages}
{workflows}

## Structure
```
server/
  index.js              # Express app setup, middleware, routes
  routes/auth.js        # register, login, logout
  routes/[entity].js    # CRUD routes per entity
  middleware/auth.js    # JWT verification
  prisma/schema.prisma  # all models
client/src/
  App.jsx               # router
  pages/  components/  lib/api.js  lib/auth.jsx
```

## Authentication
- bcrypt password hashes, JWT returned on register and login, bearer header on every call.
{features}
## Replit Conventions
- Keep the file structure flat with a single `server/index.js` entry point.
- Do NOT create Docker files or CI/CD pipelines; Replit handles deployment.
- Use Replit Secrets for environment variables. Serve on port 3000.
{lean}
{footer}"#,
        scope = scope(input),
        idea = input.idea,
        target = target_bold(input),
        stack = stack_block(input.stack, Some(&["frontend", "frontend_ui", "backend", "database", "auth", "infra"])),
        entities = entities_block(input.domain),
        endpoints = endpoints_block(input.domain),
        pages = pages_block(input.domain),
        workflows = workflows_block(input.domain),
        features = features,
        lean = if input.mode.is_mvp() {
            "- MVP only: skip tests, monitoring, and advanced features."
        } else {
            ""
        },
        footer = QUALITY_FOOTER,
    )
}

fn replit_backend(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a Node.js backend engineer. Build a **COMPLETE Express backend** for Replit.

## App Idea
{idea}
{target}
## Tech Stack
{stack}
- bcrypt for password hashing, jsonwebtoken for JWT
{entities}
{endpoints}

## Requirements
- RESTful JSON API with CRUD for every entity.
- Validation with express-validator or zod.
- Error middleware returning JSON, never stack traces.
- Pagination: `?page=1&limit=20`.
- `server/seed.js` with sample data.
{footer}"#,
        idea = input.idea,
        target = target_bold(input),
        stack = stack_block(input.stack, Some(&["backend", "database"])),
        entities = entities_block(input.domain),
        endpoints = endpoints_block(input.domain),
        footer = QUALITY_FOOTER,
    )
}

fn replit_frontend(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a React frontend engineer. Build a **COMPLETE frontend** for a Replit app.

## App Idea
{idea}
{target}
## Tech Stack
{stack}
- react-hook-form + zod for forms, fetch with an auth wrapper
{pages}

## Requirements
- Auth flow: register, login, redirect to dashboard; protected routes redirect to login.
- `lib/api.js` adds the auth header and handles 401; `lib/auth.jsx` holds the AuthContext.
- Loading, error and empty states, a responsive layout, toast notifications.
{footer}"#,
        idea = input.idea,
        target = target_bold(input),
        stack = stack_block(input.stack, Some(&["frontend", "frontend_ui"])),
        pages = pages_block(input.domain),
        footer = QUALITY_FOOTER,
    )
}

fn replit_database(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a database engineer. Design a **Prisma schema** for a Replit app.

## App Idea
{idea}
{entities}

## Requirements
- A complete `prisma/schema.prisma` for PostgreSQL.
- `id String @id @default(uuid())`, `createdAt` and `updatedAt` on every model.
- Relations with `@relation` and `@@index` on queried fields.
- A seed script (`server/seed.js`) with sample data.
{footer}"#,
        idea = input.idea,
        entities = entities_block(input.domain),
        footer = QUALITY_FOOTER,
    )
}

pub fn base44(input: &ProceduralInput<'_>) -> PromptPack {
    let mut pack = PromptPack::new();
    pack.insert("master_prompt".into(), base44_master(input));
    pack.insert("entity_design".into(), base44_entities(input));
    pack.insert("page_design".into(), base44_pages(input));
    pack
}

fn base44_master(input: &ProceduralInput<'_>) -> String {
    let integrations = feature_section(
        input,
        "Integrations",
        &[
            (FeatureFlag::Payments, "**Stripe**: payment processing, subscriptions, invoicing."),
            (FeatureFlag::Ai, "**OpenAI**: AI-powered text generation and analysis."),
            (FeatureFlag::Notifications, "**SendGrid/Resend**: transactional emails and notifications."),
        ],
    );
    format!(
        r#"Build a **complete application** using **Base44** (base44.com).
Base44 is a data-first AI app builder: you define entities and pages, and it generates everything.
Do NOT write code. Describe the data model, pages, and workflows instead.

## Project Description
{idea}
{target}{entities}
{pages}
{workflows}

## Entity Definitions (Base44 format)
For each entity: a PascalCase name, typed fields (Text, Number, Boolean, Date, DateTime, Email,
URL, Image, File, Relation, Select, MultiSelect, JSON), relations, display field and default sort.

## Page Definitions
For each page: name and route, type (List, Detail, Form, Dashboard, Custom), data source,
visible fields, actions and filters.

## Workflow / Automation Rules
Trigger (create, update, delete, scheduled), condition, and action (email, update field,
create record, webhook).
{integrations}
## Authentication & Roles
- Define roles (e.g. Admin, Member, Viewer) and their access per entity, page and field.

## Base44 Conventions
- Use Relations to link entities and Select/MultiSelect for enum-like fields.
- Use the Workflow builder for business logic.
- {closing}"#,
        idea = input.idea,
        target = target_bold(input),
        entities = entities_block(input.domain),
        pages = pages_block(input.domain),
        workflows = workflows_block(input.domain),
        integrations = integrations,
        closing = if input.mode.is_mvp() {
            "MVP: only include essential entities and pages."
        } else {
            "Include all entities, pages, and workflows for a complete app."
        },
    )
}

fn base44_entities(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"Define the **complete entity model** for a Base44 app.

## App Idea
{idea}
{entities}

## For Each Entity, Provide
- **Description**: what the entity represents
- **Fields**:
  | Field Name | Type | Required | Default | Notes |
  |------------|------|----------|---------|-------|
- **Relations**: belongsTo / hasMany
- **Display Field** and **Default Sort**

## Field Type Reference
Text, LongText, Number, Boolean, Date, DateTime, Email, URL, Image, File, Relation, Select,
MultiSelect, JSON."#,
        idea = input.idea,
        entities = entities_block(input.domain),
    )
}

fn base44_pages(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"Define the **complete page layout** for a Base44 app.

## App Idea
{idea}
{pages}
{workflows}

## For Each Page, Provide
- **Route** and **Type** (List | Detail | Form | Dashboard | Custom)
- **Data Source** and displayed fields, sort order, filters, search
- **Actions**: create, row actions, bulk actions
- **Access**: which roles can view the page

## Dashboard Pages
Stat cards (label, value source, icon), charts (type, data source, axes), and a date range filter."#,
        idea = input.idea,
        pages = pages_block(input.domain),
        workflows = workflows_block(input.domain),
    )
}

/// Master prompt that replaces the default one when targeting Claude Code
pub fn claude_code_master(input: &ProceduralInput<'_>) -> String {
    let lean = input.mode.is_mvp();
    let features = feature_section(
        input,
        "Feature Integrations",
        &[
            (FeatureFlag::Realtime, "Real-time: WebSocket endpoint at `/ws?token=<jwt>` with a connection manager and Redis pub/sub; `useWebSocket` hook with auto-reconnect."),
            (FeatureFlag::Payments, "Stripe: checkout sessions, webhook handler, billing portal, subscription management."),
            (FeatureFlag::Ai, "AI: LLM service with streaming, prompt manager, SSE endpoint."),
        ],
    );
    let industry = input
        .industry
        .map(|i| format!("**Industry:** {}\n", i))
        .unwrap_or_default();
    format!(
        r#"You are using **Claude Code** to build a {scope} application.
Generate every file needed. Create each file, then run the project to verify it.

## Workflow
1. Create the project directory structure first.
2. Write backend files in order: models, schemas, services, routes, main.py.
3. Write frontend files in order: layout, pages, components, lib.
4. Install dependencies with `pip install -r requirements.txt` and `npm install`.
5. Run `alembic upgrade head`.
6. Start the backend with `uvicorn app.main:app --reload` and check `/health`.
7. Start the frontend with `npm run dev` and walk through the auth flow.
8. Commit with git after each major phase.

## Project Description
{idea}
{target}{industry}{constraints}
## Tech Stack
{stack}
{entities}
{endpoints}
{pages}
{workflows}

## Backend (FastAPI)
- SQLAlchemy 2.0 async, Pydantic schemas, Alembic migrations, a global JSON error handler.
- JWT auth: access token (15 min) + refresh token (7 days).

## Frontend (Next.js 14)
- App Router with an authenticated layout, react-hook-form + zod, a central API client.
- Loading, error and empty states; responsive Tailwind layout.
{features}
## Deployment
- Multi-stage Dockerfiles, `docker-compose.yml`, `.github/workflows/ci.yml`.

## Quality
- All code COMPLETE with error handling, input validation, logging and type hints.
- {tests}"#,
        scope = if lean { "MVP" } else { "COMPLETE, PRODUCTION-READY" },
        idea = input.idea,
        target = target_bold(input),
        industry = industry,
        constraints = constraints_section(input.constraints),
        stack = stack_block(input.stack, None),
        entities = entities_block(input.domain),
        endpoints = endpoints_block(input.domain),
        pages = pages_block(input.domain),
        workflows = workflows_block(input.domain),
        features = features,
        tests = if lean {
            "MVP: skip tests, CI/CD and advanced monitoring."
        } else {
            "Include pytest tests, Jest tests and Playwright E2E tests."
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{detect, FeatureFlagSet};
    use crate::pipeline::Mode;
    use crate::stack::choose;
    use crate::tools::ToolProfileRegistry;

    #[test]
    fn test_tool_pack_keys() {
        let registry = ToolProfileRegistry::with_defaults();
        let flags = FeatureFlagSet::new();
        let stack = choose(&flags);

        let cases: [(&str, &[&str]); 3] = [
            ("lovable", &["database_schema", "frontend_code", "master_prompt"]),
            ("replit", &["backend_code", "database_schema", "frontend_code", "master_prompt"]),
            ("base44", &["entity_design", "master_prompt", "page_design"]),
        ];
        for (tool, expected) in cases {
            let profile = registry.resolve(Some(tool)).unwrap();
            let mut input = ProceduralInput::new("A team wiki", &flags, &stack, Mode::Production);
            input.tool = Some(&*profile);
            let pack = crate::procedural::prompts::build_prompts(&input);
            let keys: Vec<&str> = pack.keys().map(String::as_str).collect();
            assert_eq!(keys, expected, "{}", tool);
        }
    }

    #[test]
    fn test_feature_section_only_for_detected_flags() {
        let flags = detect("subscription billing for gyms");
        let stack = choose(&flags);
        let input = ProceduralInput::new("Gym billing", &flags, &stack, Mode::Mvp);

        let master = lovable_master(&input);
        assert!(master.contains("## Feature-Specific Requirements"));
        assert!(master.contains("Stripe"));
        assert!(!master.contains("Supabase Realtime on relevant tables"));
        assert!(master.contains("Keep it lean"));
    }

    #[test]
    fn test_claude_code_master_mentions_git() {
        let flags = FeatureFlagSet::new();
        let stack = choose(&flags);
        let input = ProceduralInput::new("A team wiki", &flags, &stack, Mode::Production);

        let master = claude_code_master(&input);
        assert!(master.contains("Commit with git"));
        assert!(master.contains("Playwright"));
        assert!(!master.contains("## Feature Integrations"));
    }
}
