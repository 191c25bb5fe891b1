pub mod origin_policy;
pub mod rate_limiter;
pub mod request_fields;
