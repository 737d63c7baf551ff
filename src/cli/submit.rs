use anyhow::Result;
use brochure_contact::{FormFields, SubmissionOutcome};

use crate::{
    Config, Locale,
    language::{describe, describe_error},
};

/// Sends a single message and reports how it went.
#[tracing::instrument(skip_all, fields(locale = %locale))]
pub async fn submit(config: Config, fields: FormFields, locale: Locale) -> Result<()> {
    let mut controller = super::controller(&config, locale)?;

    match controller.submit(fields).await {
        SubmissionOutcome::Failed(err) => anyhow::bail!(describe_error(locale, &err)),
        outcome => {
            println!("{}", describe(locale, &outcome));
            Ok(())
        }
    }
}
