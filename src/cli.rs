mod check_config;
mod interactive;
mod submit;

pub use check_config::check_config;
pub use interactive::interactive;
pub use submit::submit;

use brochure_contact::SubmissionController;

use crate::{Config, Locale, language::describe_error};

fn controller(config: &Config, locale: Locale) -> anyhow::Result<SubmissionController> {
    SubmissionController::from_config(&config.contact)
        .map_err(|e| anyhow::anyhow!(describe_error(locale, &e)))
}
