//! Default code-generation prompt pack
//!
//! Every prompt is self-contained: it repeats the idea and the relevant stack slots so it
//! can be pasted into a code assistant on its own.

use super::blocks::{
    constraints_section, deploy_target, endpoints_block, entities_block, pages_block,
    stack_block, target_users_section, workflows_block, MVP_QUALITY, QUALITY_FOOTER,
};
use super::tool_prompts;
use super::ProceduralInput;
use crate::features::FeatureFlag;
use crate::stack::NONE_SLOT;
use crate::tools::ToolKind;
use std::collections::BTreeMap;

pub type PromptPack = BTreeMap<String, String>;

pub fn build_prompts(input: &ProceduralInput<'_>) -> PromptPack {
    match input.tool.map(|t| t.kind) {
        Some(ToolKind::Lovable) => tool_prompts::lovable(input),
        Some(ToolKind::Replit) => tool_prompts::replit(input),
        Some(ToolKind::Base44) => tool_prompts::base44(input),
        Some(ToolKind::ClaudeCode) => {
            let mut pack = default_prompts(input);
            pack.insert("master_prompt".to_string(), tool_prompts::claude_code_master(input));
            pack
        }
        None => default_prompts(input),
    }
}

pub fn default_prompts(input: &ProceduralInput<'_>) -> PromptPack {
    let mut pack = PromptPack::new();
    if input.mode.is_mvp() {
        pack.insert("master_prompt".into(), master_mvp(input));
        pack.insert("backend_code".into(), mvp_backend(input));
        pack.insert("frontend_code".into(), mvp_frontend(input));
        pack.insert("database_schema".into(), mvp_database(input));
        return pack;
    }

    pack.insert("master_prompt".into(), master_production(input));
    pack.insert("product_requirements".into(), product_requirements(input));
    pack.insert("backend_code".into(), backend_code(input));
    pack.insert("frontend_code".into(), frontend_code(input));
    pack.insert("database_schema".into(), database_schema(input));
    pack.insert("auth_setup".into(), auth_setup(input));
    pack.insert("api_documentation".into(), api_documentation(input));
    pack.insert("deployment_config".into(), deployment_config(input));
    pack.insert("testing_suite".into(), testing_suite(input));
    pack.insert("security_checklist".into(), security_checklist(input));

    let conditional: [(FeatureFlag, &str, fn(&ProceduralInput<'_>) -> String); 6] = [
        (FeatureFlag::Realtime, "realtime_implementation", realtime_implementation),
        (FeatureFlag::Payments, "payment_integration", payment_integration),
        (FeatureFlag::Ai, "ai_integration", ai_integration),
        (FeatureFlag::Mobile, "mobile_api", mobile_api),
        (FeatureFlag::Search, "search_implementation", search_implementation),
        (FeatureFlag::FileUpload, "file_upload_system", file_upload_system),
    ];
    for (flag, key, build) in conditional {
        if input.flags.contains(flag) {
            pack.insert(key.to_string(), build(input));
        }
    }
    pack
}

/// `"\nTarget Users: x"` line used inside prompt headers
fn target_line(input: &ProceduralInput<'_>) -> String {
    input
        .target_users
        .map(|users| format!("\nTarget Users: {}", users))
        .unwrap_or_default()
}

/// Notes appended for each detected flag present in `notes`, in table order
fn flag_notes(input: &ProceduralInput<'_>, notes: &[(FeatureFlag, &str)]) -> String {
    notes
        .iter()
        .filter(|(flag, _)| input.flags.contains(*flag))
        .map(|(_, note)| format!("\n- {}", note))
        .collect()
}

fn master_production(input: &ProceduralInput<'_>) -> String {
    let industry = input
        .industry
        .map(|i| format!("\n**Industry:** {}", i))
        .unwrap_or_default();
    let features = flag_notes(
        input,
        &[
            (FeatureFlag::Realtime, "Real-time: WebSocket endpoint at `/ws?token=<jwt>`, room-based connection manager, Redis pub/sub across workers, `useWebSocket` hook with exponential-backoff reconnect."),
            (FeatureFlag::Payments, "Payments: Stripe customers on registration, checkout and billing portal sessions, subscription webhooks, pricing page."),
            (FeatureFlag::Ai, "AI: LLM service with streaming (SSE), versioned prompts, per-user rate limit and token accounting, streaming UI with stop button."),
            (FeatureFlag::FileUpload, "File upload: presigned S3/R2 URLs, thumbnails and WebP conversion, type whitelist and size limits, drag-and-drop UI."),
            (FeatureFlag::Search, "Search: indexes per searchable entity, index on write, faceted search API, debounced search bar with autocomplete."),
            (FeatureFlag::Scheduling, "Scheduling: availability windows with conflict detection, booking confirmation and reminders, calendar view."),
            (FeatureFlag::Notifications, "Notifications: in-app and email delivery, per-user preferences, real-time push of new notifications."),
            (FeatureFlag::MultiTenancy, "Multi-tenancy: organisation model, tenant-scoped queries injected from the JWT, invite flow, per-org roles."),
            (FeatureFlag::Analytics, "Analytics: aggregation queries for key metrics, Recharts dashboard with date filtering."),
            (FeatureFlag::Social, "Social: profiles, paginated activity feed, nested comments, follow/unfollow."),
        ],
    );
    let features = if features.is_empty() {
        String::new()
    } else {
        format!("\n## Feature Integrations{}\n", features)
    };

    format!(
        r#"You are a senior full-stack engineer with 15+ years of experience.
Build the **COMPLETE, PRODUCTION-READY** application described below.
Generate ALL code files (backend, frontend, database, auth, deployment) in a single response.

## Project Description
{idea}{target}{industry}
{constraints}
## Tech Stack (use these exact technologies)
{stack}
{entities}
{endpoints}
{pages}
{workflows}

## Database Schema
- SQLAlchemy 2.0 async models; every model has a UUID `id`, `created_at`, `updated_at`.
- Foreign keys with explicit ON DELETE behaviour and indexes on filtered columns.
- A complete initial Alembic migration and a seed script with realistic data.

## Authentication & Authorization
- JWT access token (15 min) + refresh token (7 days), bcrypt password hashing.
- Register, login, refresh, logout, forgot-password and reset-password endpoints.
- Frontend AuthContext and an auth guard that redirects to login.

## API Design
- RESTful JSON under `/api/`, page-based pagination, JSON error bodies with a code.
- Rate limiting: 100 req/min authenticated, 20 req/min anonymous. CORS for the frontend origin.

## Frontend Requirements
- react-hook-form + zod for every form, a central API client with token refresh.
- Skeleton loading, error states with retry, empty states, mobile-first layout.
{features}
## Deployment
- Multi-stage Dockerfiles for both services, docker-compose for local development.
- GitHub Actions: lint, test, build, deploy to {deploy}.

## Testing
- pytest + httpx for the API, Jest + React Testing Library for components, Playwright for E2E.
{footer}"#,
        idea = input.idea,
        target = target_line(input),
        industry = industry,
        constraints = constraints_section(input.constraints),
        stack = stack_block(input.stack, None),
        entities = entities_block(input.domain),
        endpoints = endpoints_block(input.domain),
        pages = pages_block(input.domain),
        workflows = workflows_block(input.domain),
        features = features,
        deploy = deploy_target(&input.stack.infra),
        footer = QUALITY_FOOTER,
    )
}

fn master_mvp(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a full-stack engineer. Build a **minimal working MVP** as fast as possible.
Generate ALL code files (backend, frontend, database) in a single response.
Keep it simple. No over-engineering.

## Idea
{idea}{target}
{constraints}
## Tech Stack
{stack}
{entities}
{endpoints}
{pages}
{workflows}

## Backend (flat structure)
```
backend/
  app/
    main.py        # FastAPI app with CORS
    models.py      # All SQLAlchemy models
    schemas.py     # All Pydantic schemas
    routes.py      # All API routes
    database.py    # DB engine + session
    auth.py        # JWT auth (register + login)
  alembic/versions/001_initial.py
  requirements.txt
```
- JWT auth: register + login only. CRUD routes for each entity. One Alembic migration.

## Frontend
- Next.js App Router + Tailwind, a small fetch wrapper, JWT in localStorage.
- Auth flow: register, login, dashboard. Mobile-friendly layout.
{footer}"#,
        idea = input.idea,
        target = target_line(input),
        constraints = constraints_section(input.constraints),
        stack = stack_block(
            input.stack,
            Some(&["frontend", "frontend_ui", "backend", "database", "auth"])
        ),
        entities = entities_block(input.domain),
        endpoints = endpoints_block(input.domain),
        pages = pages_block(input.domain),
        workflows = workflows_block(input.domain),
        footer = MVP_QUALITY,
    )
}

fn mvp_backend(input: &ProceduralInput<'_>) -> String {
    let mut endpoints = endpoints_block(input.domain);
    if endpoints.is_empty() {
        endpoints = "## Endpoints\nDerive REST endpoints from the idea. At minimum:\n- POST /auth/register, POST /auth/login\n- CRUD for each core entity\n- GET /health".to_string();
    }
    format!(
        r#"You are a backend engineer. Build a **minimal working backend** (MVP) as fast as possible.

## Idea
{idea}{target}

## Tech Stack
{stack}
{entities}

## Keep It Simple
- Flat structure: `app/main.py`, `app/models.py`, `app/routes.py`, `app/schemas.py`, `app/database.py`, `app/auth.py`
- No service layer, no middleware folder, no rate limiting.
- JWT auth: register + login only.
- Simple error handling with HTTPException.
- Include `requirements.txt` and `.env.example`.

{endpoints}
{footer}"#,
        idea = input.idea,
        target = target_line(input),
        stack = stack_block(input.stack, Some(&["backend", "database", "auth"])),
        entities = entities_block(input.domain),
        endpoints = endpoints,
        footer = MVP_QUALITY,
    )
}

fn mvp_frontend(input: &ProceduralInput<'_>) -> String {
    let mut pages = pages_block(input.domain);
    if pages.is_empty() {
        pages = "## Pages\n- Landing, Login, Register, Dashboard (main feature), Settings".to_string();
    }
    format!(
        r#"You are a frontend engineer. Build a **minimal working frontend** (MVP) as fast as possible.

## Idea
{idea}{target}

## Tech Stack
{stack}

## Keep It Simple
- Next.js App Router with minimal pages.
- A simple `fetch()` wrapper for API calls; no state-management library.
- Store the JWT in localStorage.
- Loading spinners and basic form validation.

{pages}

## Must Have
- Auth flow: register, login, redirect to dashboard.
- Dashboard shows the core feature of the app.
- Logout button and a mobile-friendly layout.
{footer}"#,
        idea = input.idea,
        target = target_line(input),
        stack = stack_block(input.stack, Some(&["frontend", "frontend_ui"])),
        pages = pages,
        footer = MVP_QUALITY,
    )
}

fn mvp_database(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a database engineer. Design a **minimal database schema** for an MVP.

## Idea
{idea}

## Tech Stack
{stack}
{entities}

## Keep It Simple
- Only the tables the core feature needs.
- Users table: id (UUID), email, password_hash, name, created_at.
- Simple foreign keys (ON DELETE CASCADE) and indexes on email and foreign keys.
- ONE Alembic migration that creates everything.

## Deliverables
1. SQLAlchemy models in `app/models.py`
2. Alembic migration: `alembic/versions/001_initial.py`
3. Seed script: `scripts/seed.py` (3 rows per table)
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["database"])),
        entities = entities_block(input.domain),
        footer = MVP_QUALITY,
    )
}

fn product_requirements(input: &ProceduralInput<'_>) -> String {
    let domain_section = match input.domain {
        Some(domain) => format!(
            "\n## Domain Model\nCore entities to cover in the PRD: {}\n{}\n",
            domain.entity_names().join(", "),
            workflows_block(input.domain)
        ),
        None => String::new(),
    };
    format!(
        r#"You are a senior product manager with 12+ years of experience shipping SaaS products.
Write a **complete Product Requirements Document (PRD)** for the application described below.

## Application Idea
{idea}
{target}
## Chosen Tech Stack
{stack}
{domain}
## What You Must Include

1. **Problem Statement**: what pain point this solves and why now.
2. **User Personas**: at least 3, with names, roles, goals and frustrations.
3. **User Stories**: at least 15 in Given/When/Then format, including edge cases and error states.
4. **MVP Feature Set**: prioritised as P0 (launch), P1 (fast-follow), P2 (future).
5. **Acceptance Criteria**: measurable criteria for each P0 feature.
6. **Non-Functional Requirements**: page load < 2 s, API response < 300 ms, WCAG 2.1 AA, uptime SLA.
7. **Success Metrics**: 5+ KPIs with concrete targets.
8. **Risks and Mitigations**: at least 5.
9. **Out of Scope**: what the MVP explicitly excludes.
{footer}"#,
        idea = input.idea,
        target = target_users_section(input.target_users),
        stack = stack_block(input.stack, None),
        domain = domain_section,
        footer = QUALITY_FOOTER,
    )
}

fn backend_code(input: &ProceduralInput<'_>) -> String {
    let notes = flag_notes(
        input,
        &[
            (FeatureFlag::Realtime, "Implement WebSocket endpoints for real-time features using FastAPI WebSocket support."),
            (FeatureFlag::Payments, "Integrate the Stripe SDK: products, prices, subscriptions, webhook handler, customer portal."),
            (FeatureFlag::Ai, "Integrate the OpenAI SDK: chat completions and embeddings, with prompt versioning and token tracking."),
            (FeatureFlag::FileUpload, "Implement a presigned-URL upload flow to S3/R2 with file-type validation and size limits."),
            (FeatureFlag::Search, "Implement search indexing and a query endpoint."),
            (FeatureFlag::Scheduling, "Implement scheduling with availability windows, booking conflicts, and reminders."),
            (FeatureFlag::Notifications, "Implement a notification service: in-app, email, and optional SMS."),
            (FeatureFlag::MultiTenancy, "Implement tenant isolation: org-scoped models and middleware injecting the current tenant."),
            (FeatureFlag::Analytics, "Implement analytics aggregation endpoints for dashboard data."),
        ],
    );
    let mut endpoints = endpoints_block(input.domain);
    if endpoints.is_empty() {
        endpoints = "\n## API Endpoints (implement ALL)\nDesign RESTful endpoints for every core entity identified in the idea.".to_string();
    }
    format!(
        r#"You are a senior Python backend engineer specialising in FastAPI.
Produce **COMPLETE, WORKING, PRODUCTION-READY** backend code for the application below.

## Application Idea
{idea}{target}

## Tech Stack (use these exact technologies)
{stack}
{entities}
{endpoints}

For each endpoint provide the method and path, Pydantic request and response schemas,
the auth requirement (public / authenticated / admin), and the HTTP status codes.
{notes}

## Database Models
- SQLAlchemy 2.0 async style with `mapped_column`.
- Every model has `id` (UUID), `created_at`, `updated_at`.
- Foreign keys with ON DELETE behaviour and indexes on filtered columns.

## Authentication & Authorization
- JWT access + refresh tokens, bcrypt via passlib, a `get_current_user` dependency.

## Error Handling
- NotFoundError, ConflictError, ForbiddenError and a global JSON exception handler.
- Never leak stack traces to the client.
{footer}"#,
        idea = input.idea,
        target = target_line(input),
        stack = stack_block(
            input.stack,
            Some(&["backend", "database", "cache", "auth", "ai", "monitoring"])
        ),
        entities = entities_block(input.domain),
        endpoints = endpoints,
        notes = notes,
        footer = QUALITY_FOOTER,
    )
}

fn frontend_code(input: &ProceduralInput<'_>) -> String {
    let notes = flag_notes(
        input,
        &[
            (FeatureFlag::Realtime, "Implement a WebSocket client with auto-reconnect for real-time updates."),
            (FeatureFlag::Payments, "Build a pricing page, Stripe checkout flow, and subscription management page."),
            (FeatureFlag::Ai, "Build an AI interaction UI: streaming response display, prompt input, loading states."),
            (FeatureFlag::FileUpload, "Build drag-and-drop file upload with progress bar and preview."),
            (FeatureFlag::Search, "Build a search bar with debounced input, autocomplete dropdown, and results page."),
            (FeatureFlag::Social, "Build profile pages, activity feed, comment threads, and follow/unfollow."),
            (FeatureFlag::Analytics, "Build a dashboard page with Recharts line charts, bar charts and stat cards."),
            (FeatureFlag::Scheduling, "Build a calendar view, booking form, and availability picker."),
        ],
    );
    let mut pages = pages_block(input.domain);
    if pages.is_empty() {
        pages = "\n## Pages to Build (based on the idea)\nAnalyse the idea and build pages for every core workflow.".to_string();
    }
    format!(
        r#"You are a senior frontend engineer specialising in Next.js and React.
Produce **COMPLETE, WORKING, PRODUCTION-READY** frontend code for the application below.

## Application Idea
{idea}{target}

## Tech Stack (use these exact technologies)
{stack}
- Forms: react-hook-form + zod validation
- HTTP client: fetch API with a typed wrapper
{pages}
Each page needs loading, error and empty states, a responsive layout, and a page title.
{workflows}
{notes}

## API Integration
- A central `api-client.js` adds the bearer token, refreshes on 401, and throws descriptive errors.

## Authentication Flow
- Login and register store tokens and redirect to the dashboard.
- AuthProvider wraps the dashboard layout; logout clears tokens.
{footer}"#,
        idea = input.idea,
        target = target_line(input),
        stack = stack_block(input.stack, Some(&["frontend", "frontend_ui"])),
        pages = pages,
        workflows = workflows_block(input.domain),
        notes = notes,
        footer = QUALITY_FOOTER,
    )
}

fn database_schema(input: &ProceduralInput<'_>) -> String {
    let extra = flag_notes(
        input,
        &[
            (FeatureFlag::MultiTenancy, "Add `tenant_id` to every tenant-scoped table with Row-Level Security policies."),
            (FeatureFlag::Ai, "Include a pgvector `vector` column for embedding storage where relevant."),
            (FeatureFlag::Scheduling, "Include `tstzrange` columns for availability windows with exclusion constraints."),
            (FeatureFlag::Analytics, "Include a partitioned events table for time-series analytics."),
        ],
    );
    let entities = entities_block(input.domain);
    let entity_design = if entities.is_empty() {
        "1. **Entity Design**: identify every entity from the idea; give each a snake_case plural table name, typed columns, a UUID primary key and timestamps.".to_string()
    } else {
        format!(
            "{}\n\n1. **Entity Design**: create tables for ALL the entities listed above, with every listed field plus any you identify, a UUID primary key and timestamps.",
            entities
        )
    };
    format!(
        r#"You are a senior database architect specialising in PostgreSQL.
Produce a **COMPLETE, MIGRATION-READY** database schema for the application below.

## Application Idea
{idea}

## Tech Stack
{stack}

## Requirements
{design}
2. **Relationships**: every FK with ON DELETE behaviour; explicit join tables for many-to-many.
3. **Indexes**: columns, type, uniqueness, and the query each one serves.
4. **Constraints**: CHECK, UNIQUE and NOT NULL where appropriate.
5. **Alembic Migration**: `alembic/versions/001_initial.py`.
6. **Seed Data**: `backend/scripts/seed.py` with at least 5 rows per table.
{extra}
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["database"])),
        design = entity_design,
        extra = extra,
        footer = QUALITY_FOOTER,
    )
}

fn auth_setup(input: &ProceduralInput<'_>) -> String {
    let extra = flag_notes(
        input,
        &[
            (FeatureFlag::AuthAdvanced, "RBAC with superadmin/admin/member/viewer roles, OAuth login (Google + GitHub), and TOTP 2FA with recovery codes."),
            (FeatureFlag::MultiTenancy, "Tenant-scoped auth: users belong to organisations, the JWT carries `org_id`, and invited users auto-join."),
        ],
    );
    format!(
        r#"You are a senior security engineer specialising in authentication and authorization.
Produce **COMPLETE, PRODUCTION-READY** authentication and authorization code.

## Application Idea
{idea}

## Tech Stack
{stack}

## Backend Auth
1. Password hashing with bcrypt.
2. Access token (15 min) + refresh token (7 days), HS256 with `JWT_SECRET`.
3. Endpoints: register, login, refresh, logout (revokes the refresh token), forgot-password, reset-password.
4. `get_current_user` and `require_authenticated` dependencies.
{extra}

## Frontend Auth
1. AuthContext exposing user, login(), register(), logout(), isLoading.
2. Access token in memory, refresh token in an httpOnly cookie.
3. Auth guard redirecting to /login.
4. Login, Register, Forgot Password and Reset Password pages.
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["auth", "backend", "frontend", "database"])),
        extra = extra,
        footer = QUALITY_FOOTER,
    )
}

fn api_documentation(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a senior API designer. Produce a **COMPLETE OpenAPI 3.0 specification** (YAML)
for the application below, plus a human-readable API reference in Markdown.

## Application Idea
{idea}

## Tech Stack
{stack}
{entities}
{endpoints}

## Requirements
1. Document every endpoint (and the standard auth endpoints) with parameters, example bodies and error responses.
2. Reusable component schemas for every entity (create, read, update, list).
3. The bearer token scheme and how to obtain tokens.
4. The pagination query parameters and response envelope.
5. Rate-limit headers and URL versioning under `/api/v1/`.

Produce `openapi.yaml` and `API_REFERENCE.md`.
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["backend", "auth"])),
        entities = entities_block(input.domain),
        endpoints = endpoints_block(input.domain),
        footer = QUALITY_FOOTER,
    )
}

fn deployment_config(input: &ProceduralInput<'_>) -> String {
    let mut extra = flag_notes(
        input,
        &[(FeatureFlag::Realtime, "Configure sticky sessions or a WebSocket-compatible load balancer.")],
    );
    if input.flags.contains(FeatureFlag::Search) {
        extra.push_str(&format!("\n- Include {} in docker-compose.", input.stack.search));
    }
    if input.stack.cache != NONE_SLOT {
        extra.push_str("\n- Include a Redis service in docker-compose with persistence.");
    }
    format!(
        r#"You are a senior DevOps engineer. Produce **COMPLETE, PRODUCTION-READY** deployment
and infrastructure configuration for the application below.

## Application Idea
{idea}

## Tech Stack
{stack}

## Deliverables (create ALL files)
1. `backend/Dockerfile` and `frontend/Dockerfile`: multi-stage, slim runner, non-root user.
2. `docker-compose.yml`: backend, frontend, PostgreSQL 16, plus supporting services.
3. `.github/workflows/ci.yml`: lint, test, build, deploy to {deploy}.
4. `.env.example` files with every variable documented, and the secrets CI/CD needs.
5. Run `alembic upgrade head` before deploy; a health check that verifies DB connectivity.
{extra}
{footer}"#,
        idea = input.idea,
        stack = stack_block(
            input.stack,
            Some(&["backend", "frontend", "database", "cache", "infra", "monitoring"])
        ),
        deploy = deploy_target(&input.stack.infra),
        extra = extra,
        footer = QUALITY_FOOTER,
    )
}

fn testing_suite(input: &ProceduralInput<'_>) -> String {
    let extra = flag_notes(
        input,
        &[
            (FeatureFlag::Payments, "Mock Stripe API calls with stripe-mock or pytest fixtures."),
            (FeatureFlag::Ai, "Mock OpenAI responses with deterministic fixtures."),
            (FeatureFlag::Realtime, "Test WebSocket connections with the httpx async client."),
        ],
    );
    let mut files = vec!["- `test_auth.py`: register, login, refresh, logout, invalid credentials, expired tokens".to_string()];
    match input.domain.filter(|d| !d.entities.is_empty()) {
        Some(domain) => files.extend(domain.entities.iter().map(|e| {
            format!(
                "- `test_{}.py`: {} CRUD, validation errors, auth requirements, pagination",
                e.table_name(),
                e.name
            )
        })),
        None => files.push("- `test_[domain].py`: for each entity, CRUD, validation errors, auth requirements, pagination".to_string()),
    }
    files.push("- `test_middleware.py`: error handler, rate limiting".to_string());

    format!(
        r#"You are a senior QA engineer. Produce a **COMPLETE, READY-TO-RUN** test suite
for the application below.

## Application Idea
{idea}

## Tech Stack
{stack}

## Backend Tests (pytest)
- `conftest.py` with an async client, a rolled-back DB session, an authenticated client, and factories.

### Test Files (create ALL)
{files}

Target 80%+ line coverage.

## Frontend Tests (Jest + React Testing Library)
- Pages render, load and fail gracefully; forms validate and submit; the API client refreshes tokens.

## E2E Tests (Playwright)
- `e2e/auth.spec.js`: registration, login, dashboard.
- One happy-path spec per major feature.
{extra}
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["backend", "frontend", "testing", "database"])),
        files = files.join("\n"),
        extra = extra,
        footer = QUALITY_FOOTER,
    )
}

/// Compliance notes keyed off the free-text industry hint
pub fn compliance_notes(industry: Option<&str>) -> String {
    let lowered = industry.map(str::to_lowercase).unwrap_or_default();
    let matches = |keys: &[&str]| keys.iter().any(|k| lowered.contains(k));

    let mut notes = String::new();
    if matches(&["health", "medical", "hipaa"]) {
        notes.push_str("\n- **HIPAA**: PHI encrypted at rest and in transit, audit logging, BAA with the cloud provider.");
    }
    if matches(&["finance", "fintech", "banking", "pci"]) {
        notes.push_str("\n- **PCI-DSS**: tokenise card data, never store raw numbers, quarterly vulnerability scans.");
    }
    if matches(&["eu", "gdpr", "europe"]) {
        notes.push_str("\n- **GDPR**: cookie consent, data export and deletion endpoints, DPAs with processors.");
    }
    if notes.is_empty() {
        notes.push_str("\n- **GDPR basics**: cookie consent banner, privacy policy page, data deletion capability.");
    }
    notes
}

fn security_checklist(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a senior application security engineer. Produce a **COMPLETE security
hardening guide and implementation checklist** for the application below.

## Application Idea
{idea}

## Tech Stack
{stack}

## Security Checklist (implement or verify ALL)
### Input Validation
- Pydantic on the backend, zod on the frontend, sanitised HTML output, validated uploads.
### Authentication
- bcrypt cost 12, 256-bit JWT secret, refresh-token rotation, lockout after 5 failed logins.
### HTTP Security Headers
- CSP without inline scripts, nosniff, X-Frame-Options DENY, HSTS, strict referrer policy.
### API Security
- Rate limits, explicit CORS origins, request size limits, no secrets in URLs or logs.
### Database Security
- Parameterised queries, a least-privilege DB user, encrypted PII, tested backups.
### Dependencies and Secrets
- `pip-audit` and `npm audit` in CI, automated update PRs, secrets only in the environment.
### Compliance
{compliance}
### Monitoring & Incident Response
- Log authentication events, alert on anomalies, keep an incident runbook.
{footer}"#,
        idea = input.idea,
        stack = stack_block(
            input.stack,
            Some(&["backend", "frontend", "auth", "database", "infra"])
        ),
        compliance = compliance_notes(input.industry),
        footer = QUALITY_FOOTER,
    )
}

fn realtime_implementation(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a senior backend engineer specialising in real-time systems.
Produce **COMPLETE, PRODUCTION-READY** real-time communication code.

## Application Idea
{idea}

## Tech Stack
{stack}

## Backend
1. `app/services/ws_manager.py`: user to connection registry, connect, disconnect, room broadcast.
2. `app/api/routes/ws.py`: `/ws?token=<jwt>`, JSON messages with `type` and `payload`, routed by type.
3. Presence events (`user_joined`, `user_left`, `typing`) plus domain events for this app.
4. `app/services/pubsub.py`: Redis pub/sub so broadcasts reach every worker.

## Frontend
1. `lib/use-websocket.js`: JWT connect, exponential-backoff reconnect (1s to 30s), `sendMessage`, `isConnected`.
2. A connection status indicator and optimistic updates with rollback.
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["backend", "cache", "frontend"])),
        footer = QUALITY_FOOTER,
    )
}

fn payment_integration(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a senior backend engineer specialising in payment systems.
Produce **COMPLETE, PRODUCTION-READY** Stripe payment integration code.

## Application Idea
{idea}

## Tech Stack
{stack}
- Payments: Stripe Python SDK + Stripe.js

## Backend
1. `app/services/stripe_service.py`: customers, checkout sessions, billing portal, webhook verification.
2. `POST /api/webhooks/stripe`: checkout, subscription and invoice events, idempotent by event id.
3. `Subscription` and `PaymentEvent` models.
4. `GET /api/pricing`, `POST /api/checkout`, `POST /api/billing-portal`, `GET /api/subscription`.

## Frontend
1. Pricing page with plan cards and a highlighted plan.
2. Checkout redirect with success and cancel pages.
3. Billing settings page linking to the customer portal.
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["backend", "frontend", "auth", "database"])),
        footer = QUALITY_FOOTER,
    )
}

fn ai_integration(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a senior AI/ML engineer specialising in LLM integration.
Produce **COMPLETE, PRODUCTION-READY** AI integration code.

## Application Idea
{idea}

## Tech Stack
{stack}

## Backend
1. `app/services/llm_service.py`: `generate`, `generate_stream`, `embed`, retry on 429, token counting, cost logging.
2. Versioned prompt templates stored in the database.
3. A streaming SSE endpoint and per-user rate limits.
4. Embedding storage and similarity search if the idea needs retrieval.

## Frontend
- Streaming text display with a stop button and markdown rendering.
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["backend", "ai", "database", "cache"])),
        footer = QUALITY_FOOTER,
    )
}

fn mobile_api(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a senior backend engineer specialising in mobile APIs.
Produce **COMPLETE, PRODUCTION-READY** mobile-optimised API code.

## Application Idea
{idea}

## Tech Stack
{stack}

## Requirements
1. Composite endpoints that return everything a screen needs in one request.
2. Cursor-based pagination for every list.
3. Device registration and push notifications via FCM/APNs.
4. A `/api/sync` endpoint returning changes since a timestamp for offline-first clients.
5. API version headers and a minimum supported client version check.
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["backend", "frontend", "database"])),
        footer = QUALITY_FOOTER,
    )
}

fn search_implementation(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a senior backend engineer specialising in search.
Produce **COMPLETE, PRODUCTION-READY** search code using {engine}.

## Application Idea
{idea}

## Tech Stack
{stack}

## Requirements
1. Index settings per searchable entity: searchable, filterable and sortable attributes.
2. Index on create and update, remove on delete, plus a full reindex command.
3. `GET /api/search?q=&filters=` returning hits, total and facets.
4. Frontend search bar with debounce, autocomplete and a results page with facets.
{footer}"#,
        engine = input.stack.search,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["backend", "search", "frontend"])),
        footer = QUALITY_FOOTER,
    )
}

fn file_upload_system(input: &ProceduralInput<'_>) -> String {
    format!(
        r#"You are a senior backend engineer specialising in file storage.
Produce **COMPLETE, PRODUCTION-READY** file upload code.

## Application Idea
{idea}

## Tech Stack
{stack}

## Requirements
1. `POST /api/uploads/presign` returning an upload URL and file key; `POST /api/uploads/confirm` to record it.
2. Type whitelist, size limits (10MB images, 50MB documents) and magic-byte checks.
3. Thumbnail and WebP generation for images.
4. A drag-and-drop upload component with progress and preview.
{footer}"#,
        idea = input.idea,
        stack = stack_block(input.stack, Some(&["backend", "file_storage", "frontend"])),
        footer = QUALITY_FOOTER,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{detect, FeatureFlagSet};
    use crate::pipeline::Mode;
    use crate::stack::choose;

    fn keys(pack: &PromptPack) -> Vec<&str> {
        pack.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_mvp_pack_keys() {
        let flags = FeatureFlagSet::new();
        let stack = choose(&flags);
        let input = ProceduralInput::new("A habit tracker app", &flags, &stack, Mode::Mvp);

        let pack = build_prompts(&input);
        assert_eq!(
            keys(&pack),
            vec!["backend_code", "database_schema", "frontend_code", "master_prompt"]
        );
    }

    #[test]
    fn test_production_pack_adds_conditional_prompts() {
        let flags = detect("A marketplace with real-time chat and file upload");
        let stack = choose(&flags);
        let input = ProceduralInput::new("A marketplace", &flags, &stack, Mode::Production);

        let pack = build_prompts(&input);
        assert_eq!(pack.len(), 10 + 3);
        assert!(pack.contains_key("realtime_implementation"));
        assert!(pack.contains_key("payment_integration"));
        assert!(pack.contains_key("file_upload_system"));
        assert!(!pack.contains_key("mobile_api"));
    }

    #[test]
    fn test_constraints_and_industry_in_master() {
        let flags = FeatureFlagSet::new();
        let stack = choose(&flags);
        let constraints = vec!["Must run on-prem".to_string()];
        let mut input = ProceduralInput::new("A clinic scheduler", &flags, &stack, Mode::Production);
        input.constraints = &constraints;
        input.industry = Some("Healthcare");

        let pack = build_prompts(&input);
        assert!(pack["master_prompt"].contains("- Must run on-prem"));
        assert!(pack["master_prompt"].contains("**Industry:** Healthcare"));
        assert!(pack["security_checklist"].contains("HIPAA"));
    }

    #[test]
    fn test_compliance_defaults_to_gdpr_basics() {
        assert!(compliance_notes(None).contains("GDPR basics"));
        assert!(compliance_notes(Some("FinTech")).contains("PCI-DSS"));
        assert!(!compliance_notes(Some("FinTech")).contains("GDPR basics"));
    }
}
