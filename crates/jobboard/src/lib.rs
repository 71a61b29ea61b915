pub mod api;
pub mod config;
pub mod datetime;
pub mod db;
pub mod i18n;
pub mod jobs;
pub mod queue;
pub mod scheduler;
pub mod settings;
pub mod tenant;
