//! Multi-factor authentication setup.
//!
//! Setup is a fixed sequence: confirm the user's password, initiate the chosen
//! method and verify a passcode, then enable it and hand back the recovery
//! codes. [`MfaSetup`] tracks the current step and refuses out-of-order calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::api::{ApiClient, ApiError};
use crate::entity::{EntityId, ParseError};
use crate::rows::Extra;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MfaType {
    Sms,
    Email,
    #[serde(rename = "app")]
    Totp,
    Radius,
    Push,
}

impl MfaType {
    pub const ALL: [Self; 5] = [Self::Sms, Self::Email, Self::Totp, Self::Radius, Self::Push];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Email => "email",
            Self::Totp => "app",
            Self::Radius => "radius",
            Self::Push => "push",
        }
    }

    /// Whether the passcode is delivered to a phone number or address the
    /// user enters during verification.
    pub fn needs_destination(self) -> bool {
        matches!(self, Self::Sms | Self::Email)
    }
}

impl fmt::Display for MfaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MfaType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        match lowered.as_str() {
            "totp" => Ok(Self::Totp),
            other => Self::ALL
                .into_iter()
                .find(|t| t.as_str() == other)
                .ok_or_else(|| ParseError::MfaType(s.to_owned())),
        }
    }
}

/// Method state returned by the server when a setup is initiated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MfaProps {
    pub enabled: bool,
    pub is_preferred: bool,
    pub mfa_type: String,
    pub secret: String,
    pub country_code: String,
    /// `otpauth://` URL for authenticator apps.
    pub url: String,
    pub recovery_codes: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MfaStep {
    CheckPassword,
    Verify,
    Enable,
    Done,
}

impl fmt::Display for MfaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CheckPassword => "check password",
            Self::Verify => "verify",
            Self::Enable => "enable",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MfaError {
    #[error("MFA setup is at step {actual}, expected {expected}")]
    WrongStep { expected: MfaStep, actual: MfaStep },
    #[error("{0} requires a destination")]
    MissingDestination(MfaType),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type MfaResult<T> = Result<T, MfaError>;

/// One user's MFA setup session.
#[derive(Debug, Clone)]
pub struct MfaSetup {
    user: EntityId,
    mfa_type: MfaType,
    step: MfaStep,
    props: Option<MfaProps>,
    dest: String,
    country_code: String,
}

impl MfaSetup {
    pub fn new(user: EntityId, mfa_type: MfaType) -> Self {
        Self {
            user,
            mfa_type,
            step: MfaStep::CheckPassword,
            props: None,
            dest: String::new(),
            country_code: String::new(),
        }
    }

    /// Starts a session for a user who has just signed in, skipping the
    /// password check.
    pub async fn after_sign_in(
        client: &ApiClient,
        user: EntityId,
        mfa_type: MfaType,
    ) -> MfaResult<Self> {
        let mut setup = Self::new(user, mfa_type);
        setup.initiate(client).await?;
        setup.step = MfaStep::Verify;
        Ok(setup)
    }

    pub fn step(&self) -> MfaStep {
        self.step
    }

    pub fn mfa_type(&self) -> MfaType {
        self.mfa_type
    }

    pub fn user(&self) -> EntityId {
        self.user
    }

    /// Props from the last successful initiate.
    pub fn props(&self) -> Option<&MfaProps> {
        self.props.as_ref()
    }

    fn expect_step(&self, expected: MfaStep) -> MfaResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(MfaError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    async fn initiate(&mut self, client: &ApiClient) -> MfaResult<()> {
        let props: MfaProps = client
            .post_form::<MfaProps, Value>(
                "mfa/setup/initiate",
                &[
                    ("owner", self.user.owner.as_str()),
                    ("name", self.user.name.as_str()),
                    ("mfaType", self.mfa_type.as_str()),
                ],
            )
            .await?
            .into_result()?;
        log::info!("Initiated {} MFA for {}", self.mfa_type, self.user);
        self.props = Some(props);
        Ok(())
    }

    /// Confirms the password, then initiates the selected method.
    pub async fn check_password(&mut self, client: &ApiClient, password: &str) -> MfaResult<()> {
        self.expect_step(MfaStep::CheckPassword)?;

        let body = json!({
            "owner": self.user.owner.as_str(),
            "name": self.user.name.as_str(),
            "password": password,
        });
        client
            .post_json::<_, Value, Value>("check-user-password", &[], &body)
            .await?
            .into_parts()?;

        self.initiate(client).await?;
        self.step = MfaStep::Verify;
        Ok(())
    }

    /// Picks another method while still verifying and initiates it.
    pub async fn switch_method(&mut self, client: &ApiClient, mfa_type: MfaType) -> MfaResult<()> {
        self.expect_step(MfaStep::Verify)?;
        let previous = std::mem::replace(&mut self.mfa_type, mfa_type);
        if let Err(err) = self.initiate(client).await {
            self.mfa_type = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Submits the passcode the user received or generated.
    ///
    /// `dest` is the phone number or email address for sms and email, and
    /// ignored otherwise.
    pub async fn verify(
        &mut self,
        client: &ApiClient,
        passcode: &str,
        dest: &str,
        country_code: &str,
    ) -> MfaResult<()> {
        self.expect_step(MfaStep::Verify)?;
        if self.mfa_type.needs_destination() && dest.trim().is_empty() {
            return Err(MfaError::MissingDestination(self.mfa_type));
        }

        let secret = self.secret().to_owned();
        client
            .post_form::<Value, Value>(
                "mfa/setup/verify",
                &[
                    ("mfaType", self.mfa_type.as_str()),
                    ("passcode", passcode),
                    ("secret", secret.as_str()),
                    ("dest", dest),
                    ("countryCode", country_code),
                ],
            )
            .await?
            .into_parts()?;

        self.dest = dest.to_owned();
        self.country_code = country_code.to_owned();
        self.step = MfaStep::Enable;
        Ok(())
    }

    /// Turns the method on and returns the recovery codes to show the user.
    pub async fn enable(&mut self, client: &ApiClient) -> MfaResult<Vec<String>> {
        self.expect_step(MfaStep::Enable)?;

        let secret = self.secret().to_owned();
        let recovery_codes = self.recovery_codes().join(",");
        client
            .post_form::<Value, Value>(
                "mfa/setup/enable",
                &[
                    ("owner", self.user.owner.as_str()),
                    ("name", self.user.name.as_str()),
                    ("mfaType", self.mfa_type.as_str()),
                    ("secret", secret.as_str()),
                    ("dest", self.dest.as_str()),
                    ("countryCode", self.country_code.as_str()),
                    ("recoveryCodes", recovery_codes.as_str()),
                ],
            )
            .await?
            .into_parts()?;

        log::info!("Enabled {} MFA for {}", self.mfa_type, self.user);
        self.step = MfaStep::Done;
        Ok(self.recovery_codes().to_vec())
    }

    fn secret(&self) -> &str {
        self.props.as_ref().map_or("", |p| p.secret.as_str())
    }

    fn recovery_codes(&self) -> &[String] {
        self.props
            .as_ref()
            .map(|p| p.recovery_codes.as_slice())
            .unwrap_or_default()
    }
}

/// POST `/api/delete-mfa/`; returns the user's remaining methods.
pub async fn delete_mfa(client: &ApiClient, user: &EntityId) -> MfaResult<Vec<MfaProps>> {
    log::info!("Removing MFA for {user}");
    Ok(client
        .post_form::<Vec<MfaProps>, Value>(
            "delete-mfa/",
            &[("owner", user.owner.as_str()), ("name", user.name.as_str())],
        )
        .await?
        .into_result()?)
}

/// POST `/api/set-preferred-mfa`; returns the user's methods, masked.
pub async fn set_preferred_mfa(
    client: &ApiClient,
    user: &EntityId,
    mfa_type: MfaType,
) -> MfaResult<Vec<MfaProps>> {
    Ok(client
        .post_form::<Vec<MfaProps>, Value>(
            "set-preferred-mfa",
            &[
                ("owner", user.owner.as_str()),
                ("name", user.name.as_str()),
                ("mfaType", mfa_type.as_str()),
            ],
        )
        .await?
        .into_result()?)
}
