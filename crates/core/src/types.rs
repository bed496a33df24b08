use chrono::{DateTime, Utc};

/// Database row identifier (maps to BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp used for all created/updated columns.
pub type Timestamp = DateTime<Utc>;
