pub mod clauses;

pub mod error;
