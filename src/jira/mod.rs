pub mod client;
pub mod model;

pub use client::JiraClient;
pub use model::parse_issue_dump;
