// Integration tests
//
// These run against a real PostgreSQL database (DATABASE_URL) and are marked
// #[ignore] so the default test run stays self-contained.

mod common;
mod place_creation_test;
mod premium_toggle_test;
mod race_condition_test;
mod tour_purchase_test;
