pub mod email;
pub mod rate_limit;
