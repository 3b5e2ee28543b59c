//! Implementation plans: flat for MVPs, phased for production builds

use super::blocks::{deploy_target, entity_names, names_suffix, page_names};
use super::ProceduralInput;
use crate::domain::DomainModel;
use crate::features::{FeatureFlag, FeatureFlagSet};
use crate::pipeline::Mode;
use crate::stack::StackChoice;
use crate::tools::ToolKind;

const MAX_LISTED_ENDPOINTS: usize = 6;

pub fn build_plan(input: &ProceduralInput<'_>) -> Vec<String> {
    let entities = entity_names(input.domain);
    let pages = page_names(input.domain);
    let names = Names {
        entities: entities.as_deref(),
        pages: pages.as_deref(),
    };

    match input.tool.map(|t| t.kind) {
        Some(ToolKind::Lovable) => lovable_plan(input.flags, input.mode, names),
        Some(ToolKind::Replit) => replit_plan(input.flags, input.mode, names),
        Some(ToolKind::Base44) => base44_plan(input.mode, names),
        Some(ToolKind::ClaudeCode) => default_plan(input, names, true),
        None => default_plan(input, names, false),
    }
}

#[derive(Clone, Copy)]
struct Names<'a> {
    entities: Option<&'a str>,
    pages: Option<&'a str>,
}

fn strings(steps: &[&str]) -> Vec<String> {
    steps.iter().map(|s| s.to_string()).collect()
}

fn default_plan(input: &ProceduralInput<'_>, names: Names<'_>, git_checkpoints: bool) -> Vec<String> {
    let stack = input.stack;
    if input.mode.is_mvp() {
        return mvp_plan(stack, names);
    }

    let backend = StackChoice::primary(&stack.backend);
    let frontend = StackChoice::primary(&stack.frontend);
    let database = StackChoice::primary(&stack.database);

    let mut plan = strings(&[
        "Phase 1: Foundation",
        "1.1  Define problem statement, target user personas, and measurable success metrics (DAU, retention, conversion).",
        "1.2  Write detailed user stories for the MVP scope covering happy paths, edge cases, and error states.",
        "1.3  Design system architecture: service boundaries, data flow diagram, and integration points.",
    ]);
    plan.push(format!(
        "1.4  Initialise monorepo with backend ({}) and frontend ({}).",
        backend, frontend
    ));
    if git_checkpoints {
        plan.push("1.5  Set up environment configuration (.env files) and secrets management.".to_string());
        plan.push("1.6  git commit -m 'Phase 1: project foundation and initial setup'".to_string());
    } else {
        plan.push("1.5  Configure CI pipeline: linting (ruff + eslint), type checking, and automated test runner.".to_string());
        plan.push("1.6  Set up environment configuration (.env files) and secrets management.".to_string());
    }

    plan.push("Phase 2: Core Backend".to_string());
    plan.push(format!(
        "2.1  Design and create database schema with Alembic migrations for {}.{}",
        database,
        names_suffix("Tables", names.entities)
    ));
    plan.push(format!(
        "2.2  Implement authentication system using {}: register, login, refresh, logout, password reset.",
        stack.auth
    ));
    plan.push(match names.entities {
        Some(e) => format!("2.3  Build domain models: {} (SQLAlchemy) with relationships, indexes, and validation.", e),
        None => "2.3  Build core domain models (SQLAlchemy) with relationships, indexes, and validation.".to_string(),
    });
    plan.push(match names.entities {
        Some(e) => format!("2.4  Implement service layer with business logic for: {}.", e),
        None => "2.4  Implement service layer with business logic for each domain entity.".to_string(),
    });
    plan.push(format!(
        "2.5  Build REST API routes with Pydantic request/response schemas, pagination, and filtering.{}",
        endpoint_summary(input.domain)
    ));
    plan.push("2.6  Add middleware: CORS, global error handler, rate limiting, request logging.".to_string());

    plan.push("Phase 3: Core Frontend".to_string());
    plan.push(format!(
        "3.1  Set up {} project with {} component library.",
        stack.frontend, stack.frontend_ui
    ));
    plan.extend(strings(&[
        "3.2  Build auth pages (login, register, forgot password) and AuthProvider context.",
        "3.3  Build authenticated layout: sidebar navigation, header with user menu, responsive shell.",
        "3.4  Implement API client layer with auth header injection, error handling, and token refresh.",
    ]));
    plan.push(match names.pages {
        Some(p) => format!("3.5  Build application pages: {} with forms (react-hook-form + zod), loading states, and empty states.", p),
        None => "3.5  Build core application pages with forms (react-hook-form + zod), loading states, and empty states.".to_string(),
    });
    plan.push("3.6  Implement toast notifications, confirmation dialogs, and global error boundary.".to_string());

    let feature_steps: Vec<String> = FEATURE_STEP_ORDER
        .iter()
        .filter(|flag| input.flags.contains(**flag))
        .enumerate()
        .map(|(i, flag)| format!("4.{}  {}", i + 1, feature_step(*flag, stack)))
        .collect();
    if !feature_steps.is_empty() {
        plan.push("Phase 4: Feature Integration".to_string());
        plan.extend(feature_steps);
    }

    plan.push("Phase 5: Quality & Launch".to_string());
    let mut launch = vec![
        "Write backend test suite: unit tests for services, integration tests for API routes (pytest + httpx).",
        "Write frontend tests: component tests (Jest + RTL) and E2E user flow tests (Playwright).",
        "Security review: OWASP top-10 checklist, dependency audit (pip-audit + npm audit), pen test critical flows.",
        "Performance optimisation: database query analysis (EXPLAIN), frontend bundle analysis, add caching where needed.",
        "Build Docker images, finalise docker-compose, and write CI/CD pipeline (GitHub Actions).",
    ];
    if git_checkpoints {
        launch.push("git commit -m 'Phase 5: tests, security, and deployment config'");
    }
    launch.extend([
        "Deploy to staging, run full QA pass, fix issues.",
        "Deploy to production, configure monitoring (Sentry + uptime), and set up alerting.",
        "Launch beta: gather user feedback, prioritise iteration backlog.",
    ]);
    plan.extend(
        launch
            .iter()
            .enumerate()
            .map(|(i, step)| format!("5.{}  {}", i + 1, step)),
    );

    plan
}

fn mvp_plan(stack: &StackChoice, names: Names<'_>) -> Vec<String> {
    let models = names_suffix("Models", names.entities);
    vec![
        format!(
            "1. Set up monorepo with {} backend and {} frontend.",
            StackChoice::primary(&stack.backend),
            StackChoice::primary(&stack.frontend)
        ),
        format!(
            "2. Create database schema ({}) and run initial Alembic migration.{}",
            StackChoice::primary(&stack.database),
            models
        ),
        format!(
            "3. Build backend: CRUD API routes, Pydantic schemas, basic JWT auth (register + login).{}",
            models
        ),
        format!(
            "4. Build frontend: login, register, and main dashboard pages with API integration.{}",
            names_suffix("Pages", names.pages)
        ),
        "5. Add basic styling (Tailwind), responsive layout, and navigation.".to_string(),
        "6. Test locally and verify the end-to-end auth flow and core feature.".to_string(),
        format!(
            "7. Deploy: Dockerize both services and deploy to {}.",
            deploy_target(&stack.infra)
        ),
    ]
}

fn endpoint_summary(domain: Option<&DomainModel>) -> String {
    let Some(domain) = domain.filter(|d| !d.endpoints.is_empty()) else {
        return String::new();
    };
    let mut summary = domain
        .endpoints
        .iter()
        .take(MAX_LISTED_ENDPOINTS)
        .map(|e| format!("{} {}", e.method, e.path))
        .collect::<Vec<_>>()
        .join(", ");
    if domain.endpoints.len() > MAX_LISTED_ENDPOINTS {
        summary.push_str(&format!(
            ", and {} more",
            domain.endpoints.len() - MAX_LISTED_ENDPOINTS
        ));
    }
    format!(" Endpoints: {}.", summary)
}

/// Order in which feature steps appear in Phase 4
const FEATURE_STEP_ORDER: &[FeatureFlag] = &[
    FeatureFlag::Realtime,
    FeatureFlag::Payments,
    FeatureFlag::Ai,
    FeatureFlag::FileUpload,
    FeatureFlag::Search,
    FeatureFlag::Notifications,
    FeatureFlag::Social,
    FeatureFlag::Scheduling,
    FeatureFlag::Analytics,
    FeatureFlag::AdminPanel,
    FeatureFlag::MultiTenancy,
    FeatureFlag::AuthAdvanced,
    FeatureFlag::I18n,
    FeatureFlag::Geolocation,
    FeatureFlag::Mobile,
];

fn feature_step(flag: FeatureFlag, stack: &StackChoice) -> String {
    match flag {
        FeatureFlag::Realtime => "Implement real-time layer: WebSocket endpoint, connection manager, Redis pub/sub, and frontend useWebSocket hook with auto-reconnect.".to_string(),
        FeatureFlag::Payments => "Integrate Stripe: create customers, checkout sessions, webhook handler (subscription lifecycle), pricing page, and billing portal.".to_string(),
        FeatureFlag::Ai => "Build AI integration: LLM service with streaming, prompt manager, RAG pipeline (if applicable), and frontend streaming UI component.".to_string(),
        FeatureFlag::FileUpload => "Build file upload system: presigned URL flow, image processing (thumbnails, WebP), drag-and-drop UI with progress indicator.".to_string(),
        FeatureFlag::Search => format!(
            "Implement search: set up {}, indexing pipeline, search API with facets, and frontend search bar with autocomplete.",
            stack.search
        ),
        FeatureFlag::Notifications => format!(
            "Build notification system: in-app notifications, email via {}, notification preferences, and real-time delivery.",
            stack.email
        ),
        FeatureFlag::Social => "Build social features: user profiles, activity feed, comments with threading, reactions, follow/unfollow, and content moderation.".to_string(),
        FeatureFlag::Scheduling => "Build scheduling system: calendar view, availability management, booking flow with conflict detection, and email reminders.".to_string(),
        FeatureFlag::Analytics => "Build analytics dashboard: aggregation queries, Recharts visualisations (line, bar, pie), stat cards, and date range filtering.".to_string(),
        FeatureFlag::AdminPanel => "Build admin panel: user management, content moderation, system configuration, and activity audit log.".to_string(),
        FeatureFlag::MultiTenancy => "Implement multi-tenancy: organisation model, tenant-scoped queries, invite flow, and role-based access within organisations.".to_string(),
        FeatureFlag::AuthAdvanced => "Implement advanced auth: OAuth social login (Google + GitHub), 2FA/MFA with TOTP, RBAC with fine-grained permissions.".to_string(),
        FeatureFlag::I18n => "Add internationalisation: next-intl setup, translation files, locale switcher, RTL support, and date/number formatting.".to_string(),
        FeatureFlag::Geolocation => "Implement geolocation features: map component (Mapbox/Leaflet), address autocomplete, proximity search, and distance calculation.".to_string(),
        FeatureFlag::Mobile => "Build mobile-optimised API: composite endpoints, cursor pagination, push notifications (FCM), and sync endpoint for offline-first.".to_string(),
    }
}

fn lovable_plan(flags: &FeatureFlagSet, mode: Mode, names: Names<'_>) -> Vec<String> {
    if mode.is_mvp() {
        return vec![
            "1. Set up new Lovable project and configure Supabase connection.".to_string(),
            format!(
                "2. Design Supabase database tables and RLS policies.{}",
                names_suffix("Tables", names.entities)
            ),
            "3. Configure Supabase Auth (email/password sign-up).".to_string(),
            format!(
                "4. Build frontend pages with React + shadcn/ui.{}",
                names_suffix("Pages", names.pages)
            ),
            "5. Connect frontend to Supabase client for data fetching and auth.".to_string(),
            "6. Test end-to-end: auth flow and core feature.".to_string(),
            "7. Deploy via Lovable's built-in hosting.".to_string(),
        ];
    }

    let mut plan = vec![
        "Phase 1: Supabase Setup".to_string(),
        "1.1  Create new Lovable project and connect Supabase instance.".to_string(),
        format!(
            "1.2  Design and create all database tables in Supabase SQL Editor.{}",
            names_suffix("Tables", names.entities)
        ),
        "1.3  Write Row-Level Security (RLS) policies for every table.".to_string(),
        "1.4  Configure Supabase Auth: email/password, OAuth providers if needed.".to_string(),
        "1.5  Set up Supabase Storage buckets with RLS (if file uploads needed).".to_string(),
        "Phase 2: Core Frontend".to_string(),
        "2.1  Set up React + Vite + Tailwind + shadcn/ui project structure.".to_string(),
        "2.2  Build auth pages: Login, Register with Supabase Auth integration.".to_string(),
        "2.3  Build authenticated layout: sidebar, header, auth guard.".to_string(),
        format!(
            "2.4  Build core application pages.{}",
            names_suffix("Pages", names.pages)
        ),
        "2.5  Implement data fetching with Supabase client (`.from().select()`).".to_string(),
        "2.6  Add forms with react-hook-form + zod validation.".to_string(),
        "Phase 3: Features & Polish".to_string(),
    ];

    let mut features: Vec<&str> = [
        (FeatureFlag::Realtime, "Enable Supabase Realtime on relevant tables for live updates."),
        (FeatureFlag::Payments, "Create Supabase Edge Function for Stripe checkout and webhooks."),
        (FeatureFlag::Ai, "Create Supabase Edge Function for OpenAI API integration."),
        (FeatureFlag::FileUpload, "Implement file uploads with Supabase Storage."),
    ]
    .into_iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, step)| step)
    .collect();
    if features.is_empty() {
        features.push("Add toast notifications, loading states, error handling.");
    }
    features.push("Polish UI: responsive design, empty states, error boundaries.");
    plan.extend(
        features
            .iter()
            .enumerate()
            .map(|(i, step)| format!("3.{}  {}", i + 1, step)),
    );

    plan.extend(strings(&[
        "Phase 4: Testing & Launch",
        "4.1  Test all user workflows end-to-end.",
        "4.2  Verify RLS policies block unauthorized access.",
        "4.3  Deploy via Lovable's built-in hosting.",
    ]));
    plan
}

fn replit_plan(flags: &FeatureFlagSet, mode: Mode, names: Names<'_>) -> Vec<String> {
    if mode.is_mvp() {
        return vec![
            "1. Set up Replit project with Node.js + Express backend and React + Vite frontend.".to_string(),
            format!(
                "2. Define Prisma schema and run initial migration.{}",
                names_suffix("Models", names.entities)
            ),
            "3. Build Express API routes: JWT auth (register + login) and CRUD endpoints.".to_string(),
            format!(
                "4. Build React frontend: auth pages, dashboard, and core feature.{}",
                names_suffix("Pages", names.pages)
            ),
            "5. Connect frontend to backend API with fetch wrapper.".to_string(),
            "6. Test locally and verify the auth flow and core feature.".to_string(),
            "7. Deploy via Replit Deployments.".to_string(),
        ];
    }

    let mut plan = vec![
        "Phase 1: Foundation".to_string(),
        "1.1  Initialise Replit project with Express backend and React + Vite frontend.".to_string(),
        format!(
            "1.2  Define Prisma schema with all models and run `prisma migrate dev`.{}",
            names_suffix("Models", names.entities)
        ),
        "1.3  Set up environment variables in Replit Secrets.".to_string(),
        "Phase 2: Backend".to_string(),
        "2.1  Build Express app: CORS, JSON parsing, error handling middleware.".to_string(),
        "2.2  Implement JWT auth: register (bcrypt hash), login (verify + return JWT).".to_string(),
        format!(
            "2.3  Build CRUD routes for each domain entity.{}",
            names_suffix("Entities", names.entities)
        ),
        "2.4  Add input validation (express-validator or zod).".to_string(),
        "2.5  Add pagination support (?page=1&limit=20).".to_string(),
        "Phase 3: Frontend".to_string(),
        "3.1  Set up React + Vite + Tailwind + shadcn/ui.".to_string(),
        "3.2  Build auth pages (login, register) and AuthContext.".to_string(),
        "3.3  Build authenticated layout: sidebar, header.".to_string(),
        format!(
            "3.4  Build application pages.{}",
            names_suffix("Pages", names.pages)
        ),
        "3.5  Implement API client with auth header injection.".to_string(),
        "3.6  Add forms, loading states, error handling, toast notifications.".to_string(),
    ];

    let features: Vec<&str> = [
        (FeatureFlag::Realtime, "Add Socket.io for real-time features."),
        (FeatureFlag::Payments, "Integrate Stripe: checkout sessions, webhook handler."),
        (FeatureFlag::Ai, "Integrate OpenAI npm package for AI features."),
    ]
    .into_iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, step)| step)
    .collect();

    let launch_phase = if features.is_empty() {
        4
    } else {
        plan.push("Phase 4: Feature Integration".to_string());
        plan.extend(
            features
                .iter()
                .enumerate()
                .map(|(i, step)| format!("4.{}  {}", i + 1, step)),
        );
        5
    };

    plan.push(format!("Phase {}: Quality & Launch", launch_phase));
    plan.extend(
        [
            "Test all user flows end-to-end.",
            "Add basic error handling and input validation.",
            "Deploy via Replit Deployments.",
        ]
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}.{}  {}", launch_phase, i + 1, step)),
    );
    plan
}

fn base44_plan(mode: Mode, names: Names<'_>) -> Vec<String> {
    if mode.is_mvp() {
        return vec![
            format!(
                "1. Define core entities in Base44.{}",
                names_suffix("Entities", names.entities)
            ),
            "2. Configure entity fields, types, and relations.".to_string(),
            format!(
                "3. Create pages for each entity.{}",
                names_suffix("Pages", names.pages)
            ),
            "4. Set up authentication and user roles.".to_string(),
            "5. Test the app in Base44 preview.".to_string(),
            "6. Publish via Base44 hosting.".to_string(),
        ];
    }

    let mut plan = vec![
        "Phase 1: Entity Design".to_string(),
        format!(
            "1.1  Define all entities with fields and types.{}",
            names_suffix("Entities", names.entities)
        ),
        "1.2  Configure relations between entities (one-to-many, many-to-many).".to_string(),
        "1.3  Set display fields and default sort for each entity.".to_string(),
        "Phase 2: Page Design".to_string(),
        format!(
            "2.1  Create List pages for each entity.{}",
            names_suffix("Pages", names.pages)
        ),
    ];
    plan.extend(strings(&[
        "2.2  Create Detail/Form pages for viewing and editing records.",
        "2.3  Create a Dashboard page with stat cards and charts.",
        "2.4  Configure filters, search, and sorting on List pages.",
        "Phase 3: Workflows & Auth",
        "3.1  Define automation rules (on create, on update triggers).",
        "3.2  Configure user roles and permissions per entity/page.",
        "3.3  Set up email notifications for key events.",
        "Phase 4: Testing & Launch",
        "4.1  Test all workflows in Base44 preview mode.",
        "4.2  Verify role-based access control.",
        "4.3  Publish via Base44 hosting.",
    ]));
    plan
}
