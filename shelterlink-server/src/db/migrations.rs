//! Schema migrations
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS` statements run at startup, plus
//! seed rows for lookup tables that ship with content (assessment questions
//! and letter templates). Seeds only apply to empty tables.

use sqlx::PgPool;

use super::exec::execute;
use super::{DbError, Statement};

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS organizations (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT,
        description TEXT,
        website TEXT,
        phone TEXT,
        email TEXT,
        address TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS emergency_shelters (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        address TEXT NOT NULL,
        city TEXT,
        postcode TEXT,
        latitude DOUBLE PRECISION,
        longitude DOUBLE PRECISION,
        capacity INTEGER,
        available_beds INTEGER,
        accepts_pets BOOLEAN NOT NULL DEFAULT FALSE,
        accepts_families BOOLEAN NOT NULL DEFAULT FALSE,
        open_24h BOOLEAN NOT NULL DEFAULT FALSE,
        phone TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS food_banks (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        address TEXT NOT NULL,
        city TEXT,
        postcode TEXT,
        latitude DOUBLE PRECISION,
        longitude DOUBLE PRECISION,
        phone TEXT,
        email TEXT,
        website TEXT,
        opening_hours TEXT,
        pet_food_available BOOLEAN NOT NULL DEFAULT FALSE,
        requires_referral BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dog_friendly_resources (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        resource_type TEXT NOT NULL,
        address TEXT,
        latitude DOUBLE PRECISION,
        longitude DOUBLE PRECISION,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dogs (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        breed TEXT,
        age_years INTEGER,
        is_service_dog BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS service_dog_certifications (
        id BIGSERIAL PRIMARY KEY,
        dog_id BIGINT NOT NULL REFERENCES dogs(id) ON DELETE CASCADE,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        certification_type TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        issued_at TIMESTAMPTZ,
        expires_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS employment_opportunities (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        employer TEXT NOT NULL,
        location TEXT,
        job_type TEXT,
        remote BOOLEAN NOT NULL DEFAULT FALSE,
        description TEXT,
        salary_range TEXT,
        apply_url TEXT,
        posted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS letter_templates (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        body TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS generated_letters (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
        template_id BIGINT NOT NULL REFERENCES letter_templates(id),
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mental_health_questions (
        id BIGSERIAL PRIMARY KEY,
        question_text TEXT NOT NULL,
        display_order INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mental_health_assessments (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
        total_score INTEGER NOT NULL,
        risk_level TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mental_health_answers (
        id BIGSERIAL PRIMARY KEY,
        assessment_id BIGINT NOT NULL REFERENCES mental_health_assessments(id) ON DELETE CASCADE,
        question_id BIGINT NOT NULL REFERENCES mental_health_questions(id),
        answer_value INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS realtime_notifications (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        notification_type TEXT NOT NULL DEFAULT 'info',
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notification_reads (
        notification_id BIGINT NOT NULL REFERENCES realtime_notifications(id) ON DELETE CASCADE,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        read_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (notification_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contact_messages (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        subject TEXT,
        message TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_accessibility_settings (
        user_id BIGINT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
        font_size TEXT NOT NULL DEFAULT 'medium',
        high_contrast BOOLEAN NOT NULL DEFAULT FALSE,
        reduce_motion BOOLEAN NOT NULL DEFAULT FALSE,
        screen_reader BOOLEAN NOT NULL DEFAULT FALSE,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS gdpr_consent_logs (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        consent_type TEXT NOT NULL,
        granted BOOLEAN NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_shelters_city ON emergency_shelters(city)",
    "CREATE INDEX IF NOT EXISTS idx_food_banks_city ON food_banks(city)",
    "CREATE INDEX IF NOT EXISTS idx_dogs_user ON dogs(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_certifications_user ON service_dog_certifications(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_letters_user ON generated_letters(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_assessments_user ON mental_health_assessments(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_answers_assessment ON mental_health_answers(assessment_id)",
    "CREATE INDEX IF NOT EXISTS idx_notifications_user ON realtime_notifications(user_id, is_read)",
    "CREATE INDEX IF NOT EXISTS idx_consent_user ON gdpr_consent_logs(user_id)",
];

/// Nine-item depression screening questions, each answered 0-3.
const QUESTIONS: &[&str] = &[
    "Little interest or pleasure in doing things",
    "Feeling down, depressed, or hopeless",
    "Trouble falling or staying asleep, or sleeping too much",
    "Feeling tired or having little energy",
    "Poor appetite or overeating",
    "Feeling bad about yourself, or that you are a failure or have let yourself or your family down",
    "Trouble concentrating on things, such as reading or watching television",
    "Moving or speaking noticeably slowly, or being unusually fidgety or restless",
    "Thoughts that you would be better off dead, or of hurting yourself",
];

/// (name, category, body)
const TEMPLATES: &[(&str, &str, &str)] = &[
    (
        "Housing support request",
        "housing",
        "Dear Housing Officer,\n\nI am writing to request assistance with emergency accommodation. \
         My current situation is as follows:\n\n{{details}}\n\nYours sincerely,\n{{name}}",
    ),
    (
        "Benefits reconsideration",
        "benefits",
        "Dear Sir or Madam,\n\nI am requesting a mandatory reconsideration of the decision dated \
         {{date}}.\n\n{{details}}\n\nYours faithfully,\n{{name}}",
    ),
    (
        "GP referral request",
        "health",
        "Dear Doctor,\n\nI would like to ask for a referral to mental-health support services.\n\n\
         {{details}}\n\nKind regards,\n{{name}}",
    ),
    (
        "Assistance dog access notice",
        "service-dogs",
        "To whom it may concern,\n\nI am accompanied by a certified assistance dog. Under the \
         Equality Act 2010, access may not be refused on this basis.\n\n{{details}}\n\n{{name}}",
    ),
];

/// Run all migrations and seeds.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running migrations...");

    for ddl in TABLES {
        execute(pool, &Statement::new(*ddl)).await?;
    }
    for ddl in INDEXES {
        execute(pool, &Statement::new(*ddl)).await?;
    }

    seed(pool).await?;

    tracing::info!(tables = TABLES.len(), "Migrations complete");
    Ok(())
}

async fn seed(pool: &PgPool) -> Result<(), DbError> {
    let seeded = execute(pool, &seed_questions()).await?;
    if seeded.rows_affected > 0 {
        tracing::info!(rows = seeded.rows_affected, "Seeded assessment questions");
    }

    let seeded = execute(pool, &seed_templates()).await?;
    if seeded.rows_affected > 0 {
        tracing::info!(rows = seeded.rows_affected, "Seeded letter templates");
    }
    Ok(())
}

/// `INSERT ... SELECT ... FROM (VALUES ...) WHERE NOT EXISTS (...)`
fn seed_questions() -> Statement {
    let mut stmt = Statement::new(
        "INSERT INTO mental_health_questions (question_text, display_order) \
         SELECT v.question_text, v.display_order FROM (VALUES ",
    );
    for (i, text) in QUESTIONS.iter().enumerate() {
        if i > 0 {
            stmt.push(", ");
        }
        stmt.push("(")
            .push_bind(*text)
            .push(", ")
            .push_bind(i as i32 + 1)
            .push("::INTEGER)");
    }
    stmt.push(
        ") AS v(question_text, display_order) \
         WHERE NOT EXISTS (SELECT 1 FROM mental_health_questions)",
    );
    stmt
}

fn seed_templates() -> Statement {
    let mut stmt = Statement::new(
        "INSERT INTO letter_templates (name, category, body) \
         SELECT v.name, v.category, v.body FROM (VALUES ",
    );
    for (i, (name, category, body)) in TEMPLATES.iter().enumerate() {
        if i > 0 {
            stmt.push(", ");
        }
        stmt.push("(")
            .push_bind(*name)
            .push(", ")
            .push_bind(*category)
            .push(", ")
            .push_bind(*body)
            .push(")");
    }
    stmt.push(") AS v(name, category, body) WHERE NOT EXISTS (SELECT 1 FROM letter_templates)");
    stmt
}
