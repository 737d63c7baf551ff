use std::io::Write;

use anyhow::Result;
use brochure_contact::{Field, SubmissionOutcome};
use strum::VariantArray;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
    task::JoinHandle,
};

use crate::{
    Config, Locale,
    language::{describe, translate},
};

/// Keeps one contact form open on stdin until EOF.
///
/// The controller lives for the whole session, so the cooldown applies
/// between consecutive messages.
#[tracing::instrument(skip_all, fields(locale = %locale))]
pub async fn interactive(config: Config, locale: Locale) -> Result<()> {
    let mut controller = super::controller(&config, locale)?;
    let printer = print_progress(controller.subscribe(), locale);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", translate(locale, "contact.title"));

    'session: loop {
        for field in Field::VARIANTS {
            prompt(&translate(locale, &format!("contact.prompt.{field}")))?;

            let Some(line) = lines.next_line().await? else {
                break 'session;
            };
            controller.update(*field, line.trim());
        }

        let fields = controller.fields().clone();
        match controller.submit(fields).await {
            outcome @ SubmissionOutcome::Failed(_) => eprintln!("{}", describe(locale, &outcome)),
            outcome => println!("{}", describe(locale, &outcome)),
        }
    }

    printer.abort();

    Ok(())
}

fn prompt(label: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;

    Ok(())
}

fn print_progress(mut status: watch::Receiver<SubmissionOutcome>, locale: Locale) -> JoinHandle<()> {
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let current = status.borrow_and_update().clone();
            if current == SubmissionOutcome::Submitting {
                println!("{}", describe(locale, &current));
            }
        }
    })
}
