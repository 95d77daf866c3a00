//! Typed row records for every editable table in the console.
//!
//! Field names follow the server's camelCase JSON. Each row keeps an `extra`
//! map for keys the console does not model, so a fetched entity can be saved
//! back without dropping them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use console_states::{Row, new_row_name, row_fields};
use serde::{Deserialize, Serialize};

/// Unmodelled JSON fields carried through unchanged.
pub type Extra = BTreeMap<String, serde_json::Value>;

/// Candidate names for [`AccountItem`] rows.
pub const ACCOUNT_ITEM_NAMES: &[&str] = &[
    "Organization",
    "ID",
    "Name",
    "Display name",
    "Avatar",
    "User type",
    "Password",
    "Email",
    "Phone",
    "Country code",
    "Country/Region",
    "Location",
    "Address",
    "Affiliation",
    "Title",
    "ID card type",
    "ID card",
    "Homepage",
    "Bio",
    "Tag",
    "Signup application",
    "Roles",
    "Permissions",
    "Groups",
    "3rd-party logins",
    "Properties",
    "Is admin",
    "Is forbidden",
    "Is deleted",
    "Multi-factor authentication",
    "WebAuthn credentials",
    "Managed accounts",
];

/// MFA methods an organization can list in its [`MfaItem`] rows.
pub const MFA_METHOD_NAMES: &[&str] = &["sms", "email", "app"];

pub const SIGNUP_ITEM_NAMES: &[&str] = &[
    "Username",
    "ID",
    "Display name",
    "Affiliation",
    "Country/Region",
    "ID card",
    "Email",
    "Password",
    "Confirm password",
    "Phone",
    "Agreement",
];

pub const SIGNIN_ITEM_NAMES: &[&str] = &[
    "Signin methods",
    "Logo",
    "Back button",
    "Languages",
    "Username",
    "Password",
    "Providers",
    "Agreement",
    "Forgot password?",
    "Login button",
    "Signup link",
    "Captcha",
    "Auto sign in",
];

/// Sign-in methods the server understands; others are dropped on save.
pub const SIGNIN_METHOD_NAMES: &[&str] = &[
    "Password",
    "Verification code",
    "WebAuthn",
    "LDAP",
    "Face ID",
    "WeChat",
];

/// One user field shown on an organization's account page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountItem {
    pub name: String,
    pub visible: bool,
    /// `Public`, `Self` or `Admin`.
    pub view_rule: String,
    /// `Self`, `Admin` or `Immutable`.
    pub modify_rule: String,
    pub regex: String,
    pub tab: String,
    #[serde(flatten)]
    pub extra: Extra,
}

row_fields!(AccountItem, key = name, {
    "name" => name: Str,
    "visible" => visible: Bool,
    "viewRule" => view_rule: Str,
    "modifyRule" => modify_rule: Str,
    "regex" => regex: Str,
    "tab" => tab: Str,
});

impl AccountItem {
    pub const PLACEHOLDER: &'static str = "Please select an account item";

    pub fn new_row(existing: &[Self]) -> Self {
        Self {
            name: new_row_name(existing, Self::PLACEHOLDER),
            visible: true,
            view_rule: "Public".to_owned(),
            modify_rule: "Self".to_owned(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MfaItem {
    pub name: String,
    /// `Optional`, `Prompt` or `Required`.
    pub rule: String,
    #[serde(flatten)]
    pub extra: Extra,
}

row_fields!(MfaItem, key = name, {
    "name" => name: Str,
    "rule" => rule: Str,
});

impl MfaItem {
    pub const PLACEHOLDER: &'static str = "Please select a MFA method";

    pub fn new_row(existing: &[Self]) -> Self {
        Self {
            name: new_row_name(existing, Self::PLACEHOLDER),
            rule: "Optional".to_owned(),
            ..Self::default()
        }
    }
}

/// A login provider bound to an application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderItem {
    pub name: String,
    pub can_sign_up: bool,
    pub can_sign_in: bool,
    pub can_unlink: bool,
    pub prompted: bool,
    pub signup_group: String,
    pub rule: String,
    #[serde(flatten)]
    pub extra: Extra,
}

row_fields!(ProviderItem, key = name, {
    "name" => name: Str,
    "canSignUp" => can_sign_up: Bool,
    "canSignIn" => can_sign_in: Bool,
    "canUnlink" => can_unlink: Bool,
    "prompted" => prompted: Bool,
    "signupGroup" => signup_group: Str,
    "rule" => rule: Str,
});

impl ProviderItem {
    pub const PLACEHOLDER: &'static str = "Please select a provider";

    pub fn new_row(existing: &[Self]) -> Self {
        Self {
            name: new_row_name(existing, Self::PLACEHOLDER),
            can_sign_up: true,
            can_sign_in: true,
            can_unlink: true,
            rule: "None".to_owned(),
            ..Self::default()
        }
    }
}

/// A field on an application's sign-up form.
///
/// `required` follows `visible`: hiding a field makes it optional and showing
/// it makes it required again.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupItem {
    pub name: String,
    pub visible: bool,
    pub required: bool,
    pub prompted: bool,
    pub label: String,
    pub placeholder: String,
    pub options: Vec<String>,
    pub regex: String,
    pub rule: String,
    pub custom_css: String,
    #[serde(flatten)]
    pub extra: Extra,
}

row_fields!(SignupItem, key = name, {
    "name" => name: Str,
    "visible" => visible: Bool,
    "required" => required: Bool,
    "prompted" => prompted: Bool,
    "label" => label: Str,
    "placeholder" => placeholder: Str,
    "options" => options: List,
    "regex" => regex: Str,
    "rule" => rule: Str,
    "customCss" => custom_css: Str,
}, changed = SignupItem::sync_required);

impl SignupItem {
    pub const PLACEHOLDER: &'static str = "Please select a signup item";

    pub fn new_row(existing: &[Self]) -> Self {
        Self {
            name: new_row_name(existing, Self::PLACEHOLDER),
            visible: true,
            required: true,
            rule: "None".to_owned(),
            ..Self::default()
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.required = visible;
    }

    fn sync_required(&mut self, key: &str) {
        if key == "visible" {
            self.required = self.visible;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SigninItem {
    pub name: String,
    pub visible: bool,
    pub required: bool,
    pub label: String,
    pub placeholder: String,
    pub rule: String,
    pub is_custom: bool,
    pub custom_css: String,
    #[serde(flatten)]
    pub extra: Extra,
}

row_fields!(SigninItem, key = name, {
    "name" => name: Str,
    "visible" => visible: Bool,
    "required" => required: Bool,
    "label" => label: Str,
    "placeholder" => placeholder: Str,
    "rule" => rule: Str,
    "isCustom" => is_custom: Bool,
    "customCss" => custom_css: Str,
}, changed = SigninItem::apply_rules);

impl SigninItem {
    pub const PLACEHOLDER: &'static str = "Please select a signin item";

    /// The captcha item only supports the pop-up rule.
    pub const CAPTCHA: &'static str = "Captcha";
    pub const CAPTCHA_RULE: &'static str = "pop up";

    pub fn new_row(existing: &[Self]) -> Self {
        Self {
            name: new_row_name(existing, Self::PLACEHOLDER),
            visible: true,
            required: true,
            rule: "None".to_owned(),
            ..Self::default()
        }
    }

    /// A free-text item, named `Text <unix millis>`.
    pub fn custom_row(existing: &[Self], now: DateTime<Utc>) -> Self {
        let name = format!("Text {}", now.timestamp_millis());
        Self {
            name: new_row_name(existing, &name),
            visible: true,
            is_custom: true,
            ..Self::default()
        }
    }

    fn apply_rules(&mut self, key: &str) {
        match key {
            "name" if self.name == Self::CAPTCHA => self.rule = Self::CAPTCHA_RULE.to_owned(),
            "visible" => self.required = self.visible,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SigninMethod {
    pub name: String,
    pub display_name: String,
    pub rule: String,
    #[serde(flatten)]
    pub extra: Extra,
}

row_fields!(SigninMethod, key = name, {
    "name" => name: Str,
    "displayName" => display_name: Str,
    "rule" => rule: Str,
});

impl SigninMethod {
    pub const PLACEHOLDER: &'static str = "Please select a signin method";

    pub fn new_row(existing: &[Self]) -> Self {
        Self {
            name: new_row_name(existing, Self::PLACEHOLDER),
            rule: "None".to_owned(),
            ..Self::default()
        }
    }

    pub fn is_supported(&self) -> bool {
        SIGNIN_METHOD_NAMES.contains(&self.name.as_str())
    }
}

/// Column mapping between a syncer's source table and user fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub casdoor_name: String,
    pub is_key: bool,
    pub is_hashed: bool,
    pub values: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

row_fields!(TableColumn, key = name, {
    "name" => name: Str,
    "type" => column_type: Str,
    "casdoorName" => casdoor_name: Str,
    "isKey" => is_key: Bool,
    "isHashed" => is_hashed: Bool,
    "values" => values: List,
});

impl TableColumn {
    pub const PLACEHOLDER: &'static str = "column";

    pub fn new_row(existing: &[Self]) -> Self {
        Self {
            name: new_row_name(existing, Self::PLACEHOLDER),
            column_type: "string".to_owned(),
            casdoor_name: "Name".to_owned(),
            ..Self::default()
        }
    }
}

/// Credentials a user keeps for another application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagedAccount {
    pub application: String,
    pub username: String,
    pub password: String,
    pub signin_url: String,
    #[serde(flatten)]
    pub extra: Extra,
}

row_fields!(ManagedAccount, key = application, {
    "application" => application: Str,
    "username" => username: Str,
    "password" => password: Str,
    "signinUrl" => signin_url: Str,
});

impl ManagedAccount {
    pub fn new_row(_existing: &[Self]) -> Self {
        Self::default()
    }
}
