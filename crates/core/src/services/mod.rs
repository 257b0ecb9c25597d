pub mod alignment_service;
pub mod chart_service;
pub mod comparison_service;
pub mod request_service;
