pub mod api;
pub mod warsummary;
