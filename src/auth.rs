//! Session lifecycle commands: register, login, logout.

use anyhow::Result;

use crate::client::{DataAccess, HttpClient, RegisterInput};
use crate::config::Config;
use crate::session::Session;

/// Register a new organization, then sign in and persist the session.
pub async fn run_register(
    config: &Config,
    org_name: &str,
    password: &str,
    industry_type: Option<String>,
    address: Option<String>,
) -> Result<()> {
    let client = HttpClient::new(&config.api)?;
    client
        .register(&RegisterInput {
            org_name: org_name.to_string(),
            password: password.to_string(),
            industry_type,
            address,
        })
        .await?;
    println!("Registered organization '{}'.", org_name);

    sign_in(&client, config, org_name, password).await
}

/// Sign in and persist the session.
pub async fn run_login(config: &Config, org_name: &str, password: &str) -> Result<()> {
    let client = HttpClient::new(&config.api)?;
    sign_in(&client, config, org_name, password).await
}

/// Remove the persisted session.
pub fn run_logout(config: &Config) -> Result<()> {
    Session::clear(&config.session.path)?;
    println!("Signed out.");
    Ok(())
}

async fn sign_in(
    client: &dyn DataAccess,
    config: &Config,
    org_name: &str,
    password: &str,
) -> Result<()> {
    let session = client.login(org_name, password).await?;
    session.save(&config.session.path)?;
    println!(
        "Signed in as {} (org {}).",
        session.org_name, session.org_id
    );
    Ok(())
}
