/// Tables for postings, plans and submitted forms.
///
/// Posting references on `forms` are plain columns: applications may point at postings
/// that are managed elsewhere.
pub const CREATE_TABLES_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        company TEXT,
        location TEXT,
        description TEXT
    );

    CREATE TABLE IF NOT EXISTS internships (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        company TEXT,
        location TEXT,
        duration_months INTEGER,
        description TEXT
    );

    CREATE TABLE IF NOT EXISTS plans (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        price_cents INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS forms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT,
        address TEXT,
        qualification TEXT,
        experience TEXT,
        skills TEXT,
        cover_letter TEXT,
        cv BLOB,
        cv_file_type TEXT,
        job_id INTEGER,
        internship_id INTEGER,
        submitted_at TEXT NOT NULL,
        CHECK ((cv IS NULL) = (cv_file_type IS NULL)),
        CHECK (job_id IS NULL OR internship_id IS NULL)
    );

    CREATE INDEX IF NOT EXISTS idx_forms_job_id ON forms(job_id);
    CREATE INDEX IF NOT EXISTS idx_forms_internship_id ON forms(internship_id);
"#;
