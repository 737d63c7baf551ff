pub mod cli;
pub mod config;
pub mod language;
pub mod observability;

pub use config::Config;
pub use language::Locale;

rust_i18n::i18n!("locales", fallback = "en");
