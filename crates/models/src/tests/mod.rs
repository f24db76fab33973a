/// Field validators and value types
pub mod validation_tests;

/// Schema round-trips against an in-memory database
pub mod db_tests;
