//! Interactive MFA setup, plus the preferred-method and disable commands.

use anyhow::{Context as _, Result};
use console_business::mfa::{delete_mfa, set_preferred_mfa};
use console_business::{ApiClient, EntityId, MfaError, MfaProps, MfaSetup, MfaType};
use inquire::{Confirm, Password, Select, Text};
use tracing::{info, instrument};

use crate::context::AppContext;
use crate::output::Output;

const SWITCH: &str = "switch";

#[instrument(skip_all, name = "mfa_setup", fields(user = %user, method = %method))]
pub async fn run_mfa_setup(
    ctx: &AppContext,
    user: EntityId,
    method: MfaType,
    skip_password: bool,
) -> Result<()> {
    let out = Output::new();
    let client = ctx.client()?;

    let mut setup = if skip_password {
        MfaSetup::after_sign_in(&client, user, method).await?
    } else {
        confirm_password(&client, &out, user, method).await?
    };

    verify(&client, &out, &mut setup).await?;

    let codes = setup.enable(&client).await?;
    info!(count = codes.len(), "mfa enabled");
    out.success(format!("Enabled {} MFA for {user}", setup.mfa_type()));
    if !codes.is_empty() {
        out.newline();
        out.subheader("Recovery codes");
        out.numbered(&codes);
        out.warning("Store these codes somewhere safe. Each one signs you in once without MFA.");
    }
    Ok(())
}

async fn confirm_password(
    client: &ApiClient,
    out: &Output,
    user: EntityId,
    method: MfaType,
) -> Result<MfaSetup> {
    let mut setup = MfaSetup::new(user, method);
    loop {
        let password = Password::new(&format!("Password for {user}:"))
            .without_confirmation()
            .prompt()
            .context("Failed to read password")?;
        match setup.check_password(client, &password).await {
            Ok(()) => return Ok(setup),
            Err(MfaError::Api(err)) => out.error(err),
            Err(err) => return Err(err.into()),
        }
    }
}

async fn verify(client: &ApiClient, out: &Output, setup: &mut MfaSetup) -> Result<()> {
    loop {
        out.newline();
        out.header(format!("{} setup for {}", setup.mfa_type(), setup.user()));
        for (label, value) in challenge_lines(setup.mfa_type(), setup.props()) {
            out.labeled_indent(label, value, 2);
        }

        let (dest, country_code) = if setup.mfa_type().needs_destination() {
            prompt_destination(setup.mfa_type())?
        } else {
            (String::new(), String::new())
        };

        let passcode = Text::new("Passcode:")
            .with_help_message("Type \"switch\" to use another method")
            .prompt()
            .context("Failed to read passcode")?;

        if passcode.trim().eq_ignore_ascii_case(SWITCH) {
            let choice = Select::new("MFA method:", MfaType::ALL.to_vec())
                .prompt()
                .context("Failed to select method")?;
            match setup.switch_method(client, choice).await {
                Ok(()) => {}
                Err(MfaError::Api(err)) => out.error(err),
                Err(err) => return Err(err.into()),
            }
            continue;
        }

        match setup
            .verify(client, passcode.trim(), &dest, &country_code)
            .await
        {
            Ok(()) => return Ok(()),
            Err(err @ (MfaError::Api(_) | MfaError::MissingDestination(_))) => out.error(err),
            Err(err) => return Err(err.into()),
        }
    }
}

fn prompt_destination(mfa_type: MfaType) -> Result<(String, String)> {
    if mfa_type == MfaType::Sms {
        let phone = Text::new("Phone number:")
            .prompt()
            .context("Failed to read phone number")?;
        let country_code = Text::new("Country code:")
            .with_default("US")
            .prompt()
            .context("Failed to read country code")?;
        Ok((phone, country_code))
    } else {
        let email = Text::new("Email address:")
            .prompt()
            .context("Failed to read email address")?;
        Ok((email, String::new()))
    }
}

/// What to show the user before asking for a passcode.
fn challenge_lines(mfa_type: MfaType, props: Option<&MfaProps>) -> Vec<(&'static str, String)> {
    let Some(props) = props else {
        return Vec::new();
    };
    match mfa_type {
        MfaType::Totp => {
            let mut lines = vec![("Secret", props.secret.clone())];
            if !props.url.is_empty() {
                lines.push(("Authenticator URL", props.url.clone()));
            }
            lines
        }
        MfaType::Sms | MfaType::Email => {
            vec![("Passcode", "sent to the destination you enter below".to_owned())]
        }
        MfaType::Radius | MfaType::Push => Vec::new(),
    }
}

#[instrument(skip_all, name = "mfa_preferred", fields(user = %user, method = %method))]
pub async fn run_mfa_preferred(ctx: &AppContext, user: EntityId, method: MfaType) -> Result<()> {
    let out = Output::new();
    let client = ctx.client()?;
    let methods = set_preferred_mfa(&client, &user, method).await?;
    out.success(format!("{method} is now the preferred MFA method for {user}"));
    print_methods(&out, &methods);
    Ok(())
}

#[instrument(skip_all, name = "mfa_disable", fields(user = %user))]
pub async fn run_mfa_disable(ctx: &AppContext, user: EntityId, confirmed: bool) -> Result<()> {
    let out = Output::new();
    if !confirmed {
        let proceed = Confirm::new(&format!("Remove every MFA method from {user}?"))
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
        if !proceed {
            out.dim("Cancelled.");
            return Ok(());
        }
    }

    let client = ctx.client()?;
    let remaining = delete_mfa(&client, &user).await?;
    out.success(format!("Removed MFA from {user}"));
    print_methods(&out, &remaining);
    Ok(())
}

fn print_methods(out: &Output, methods: &[MfaProps]) {
    if methods.is_empty() {
        return;
    }
    out.section("Methods");
    for props in methods {
        out.section_content(method_summary(props));
    }
}

fn method_summary(props: &MfaProps) -> String {
    let mut flags = Vec::new();
    if props.enabled {
        flags.push("enabled");
    }
    if props.is_preferred {
        flags.push("preferred");
    }
    if flags.is_empty() {
        props.mfa_type.clone()
    } else {
        format!("{} ({})", props.mfa_type, flags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totp() -> MfaProps {
        MfaProps {
            mfa_type: "app".to_owned(),
            secret: "JBSWY3DPEHPK3PXP".to_owned(),
            url: "otpauth://totp/console:alice".to_owned(),
            ..MfaProps::default()
        }
    }

    #[test]
    fn test_totp_challenge_shows_secret_and_url() {
        let props = totp();
        let lines = challenge_lines(MfaType::Totp, Some(&props));
        assert_eq!(lines[0], ("Secret", "JBSWY3DPEHPK3PXP".to_owned()));
        assert_eq!(lines[1].0, "Authenticator URL");
    }

    #[test]
    fn test_challenge_without_props_is_empty() {
        assert!(challenge_lines(MfaType::Totp, None).is_empty());
        assert!(challenge_lines(MfaType::Push, Some(&totp())).is_empty());
    }

    #[test]
    fn test_method_summary() {
        let mut props = totp();
        assert_eq!(method_summary(&props), "app");

        props.enabled = true;
        props.is_preferred = true;
        assert_eq!(method_summary(&props), "app (enabled, preferred)");
    }
}
