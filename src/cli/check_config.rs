use anyhow::Result;

use crate::Config;

/// Prints the resolved contact form settings, failing like `submit` would
/// when the endpoint or token is missing.
#[tracing::instrument(skip_all)]
pub async fn check_config(config: Config) -> Result<()> {
    let locale = config.site.locale;
    super::controller(&config, locale)?;

    let contact = &config.contact;
    let (endpoint, token) = contact.credentials()?;

    println!("endpoint:          {endpoint}");
    println!("token:             {}", redact(token));
    println!("ip lookup:         {}", contact.ip_lookup_url);
    println!("transport:         {}", contact.transport);
    println!("network failure:   {}", contact.network_failure);
    println!("cooldown:          {:?}", contact.cooldown());
    println!("ip lookup timeout: {:?}", contact.ip_lookup_timeout());
    println!("dispatch timeout:  {:?}", contact.dispatch_timeout());
    println!("locale:            {locale}");

    tracing::info!("Contact form configuration is complete");

    Ok(())
}

fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    format!("{visible}{}", "*".repeat(secret.chars().count().saturating_sub(2).max(4)))
}
