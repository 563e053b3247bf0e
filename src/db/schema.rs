//! SQL DDL for initializing the OrphanCare store.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `accounts.email` UNIQUE
/// - one donor / orphanage profile per account (`account_id` UNIQUE)
/// - timestamps stored as RFC3339 text
/// - donation `items` stored as a JSON array serialized as text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role TEXT NOT NULL,
    is_verified INTEGER NOT NULL DEFAULT 0,
    verification_code TEXT NULL,
    verification_sent_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    last_login TEXT NULL
);

CREATE TABLE IF NOT EXISTS donors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id TEXT NOT NULL UNIQUE REFERENCES accounts(id) ON DELETE CASCADE,
    donor_name TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    donation_pref TEXT NULL
);

CREATE TABLE IF NOT EXISTS bank_details (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_name TEXT NOT NULL,
    account_type TEXT NOT NULL,
    account_holder_name TEXT NOT NULL,
    account_number TEXT NOT NULL,
    ifsc_code TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS orphanages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id TEXT NOT NULL UNIQUE REFERENCES accounts(id) ON DELETE CASCADE,
    orphanage_name TEXT NOT NULL,
    location TEXT NOT NULL,
    capacity INTEGER NULL,
    established_date TEXT NULL, -- YYYY-MM-DD
    male_count INTEGER NULL,
    female_count INTEGER NULL,
    bank_details_id INTEGER NOT NULL REFERENCES bank_details(id)
);

CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    account_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS requirements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    orphanage_id INTEGER NOT NULL REFERENCES orphanages(id) ON DELETE CASCADE,
    category TEXT NOT NULL,
    name TEXT NOT NULL,
    quantity REAL NOT NULL,
    unit TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS donation_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    orphanage_id INTEGER NOT NULL REFERENCES orphanages(id) ON DELETE CASCADE,
    donor_account_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    category TEXT NOT NULL,
    items TEXT NOT NULL, -- JSON array
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_account_id ON sessions(account_id);
CREATE INDEX IF NOT EXISTS idx_requirements_orphanage_id ON requirements(orphanage_id);
CREATE INDEX IF NOT EXISTS idx_donation_requests_orphanage_id ON donation_requests(orphanage_id);
CREATE INDEX IF NOT EXISTS idx_donation_requests_donor ON donation_requests(donor_account_id);
"#;
