pub mod entities;
pub mod heuristics;
pub mod use_cases;
