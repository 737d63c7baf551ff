use brochure_contact::{SubmissionOutcome, SubmitError};
use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Deserialize,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

/// Looks up `path` (e.g. `contact.status.sent`), returning the path itself
/// when no translation exists.
pub fn translate(locale: Locale, path: &str) -> String {
    let locale_name: &str = locale.as_ref();
    let value = rust_i18n::t!(path, locale = locale_name);

    // rust-i18n reports a miss as the key, optionally prefixed with the locale
    if value == path || value == format!("{locale_name}.{path}") {
        return path.to_owned();
    }

    value.into_owned()
}

/// Text shown to the visitor for the current state of the contact form.
pub fn describe(locale: Locale, outcome: &SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Idle => translate(locale, "contact.status.idle"),
        SubmissionOutcome::Submitting => translate(locale, "contact.status.sending"),
        SubmissionOutcome::Succeeded => translate(locale, "contact.status.sent"),
        SubmissionOutcome::Failed(err) => describe_error(locale, err),
    }
}

pub fn describe_error(locale: Locale, err: &SubmitError) -> String {
    let locale_name: &str = locale.as_ref();

    match err {
        SubmitError::Configuration(detail) => {
            rust_i18n::t!("contact.error.configuration", locale = locale_name, detail = detail)
                .into_owned()
        }
        SubmitError::Invalid(_) => translate(locale, "contact.error.invalid"),
        SubmitError::RateLimited { remaining_secs } => rust_i18n::t!(
            "contact.error.rate_limited",
            locale = locale_name,
            seconds = remaining_secs
        )
        .into_owned(),
        SubmitError::Timeout => translate(locale, "contact.error.timeout"),
        SubmitError::Network(_) => translate(locale, "contact.error.network"),
        SubmitError::Unknown(message) if message == brochure_contact::GENERIC_FAILURE_MESSAGE => {
            translate(locale, "contact.error.unknown")
        }
        SubmitError::Unknown(message) => message.to_owned(),
    }
}
