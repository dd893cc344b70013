// Rule-based job-description parsing and CV ↔ JD matching.

pub mod fit_scoring;
pub mod handlers;
pub mod jd_parser;
