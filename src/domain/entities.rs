pub mod contact;
pub mod rate_limit;
