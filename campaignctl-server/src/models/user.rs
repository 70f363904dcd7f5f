//! Account payloads: registration, login, profile, password change

use serde::Deserialize;

use campaignctl_core::normalize_email;
use campaignctl_core::validation::{require_max_len, require_non_blank};

use super::{ValidationError, MAX_NAME_LEN, MAX_URL_LEN};

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 6;

/// Longest accepted password (hashing cost guard)
const MAX_PASSWORD_LEN: usize = 256;

const MAX_FIELD_LEN: usize = 200;

/// `POST /auth/register` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
}

/// Validated registration. The password is still plain text here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company: Option<String>,
    pub phone: Option<String>,
}

impl Registration {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let name = require_non_blank("name", self.name.as_deref().unwrap_or_default())?;
        require_max_len("name", &name, MAX_NAME_LEN)?;

        Ok(NewUser {
            name,
            email: required_email(self.email.as_deref())?,
            password: check_password("password", self.password.unwrap_or_default())?,
            company: optional("company", self.company)?,
            phone: optional("phone", self.phone)?,
        })
    }
}

/// `POST /auth/login` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Normalised email and the password as given.
    pub fn validate(self) -> Result<(String, String), ValidationError> {
        let email = required_email(self.email.as_deref())?;
        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        Ok((email, password))
    }
}

/// `PUT /auth/profile` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

/// Editable profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub name: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileInput {
    /// Apply the supplied fields over `current`. Blank optional fields clear them.
    pub fn merge(self, current: ProfileFields) -> Result<ProfileFields, ValidationError> {
        let name = match self.name {
            Some(name) => {
                let name = require_non_blank("name", &name)?;
                require_max_len("name", &name, MAX_NAME_LEN)?;
                name
            }
            None => current.name,
        };

        let avatar = match self.avatar {
            Some(avatar) => {
                let avatar = avatar.trim().to_owned();
                require_max_len("avatar", &avatar, MAX_URL_LEN)?;
                Some(avatar).filter(|a| !a.is_empty())
            }
            None => current.avatar,
        };

        Ok(ProfileFields {
            name,
            company: match self.company {
                Some(c) => optional("company", Some(c))?,
                None => current.company,
            },
            phone: match self.phone {
                Some(p) => optional("phone", Some(p))?,
                None => current.phone,
            },
            avatar,
        })
    }
}

/// `PUT /auth/change-password` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl PasswordChange {
    /// Returns `(current, new)`.
    pub fn validate(self) -> Result<(String, String), ValidationError> {
        let current = self.current_password.unwrap_or_default();
        if current.is_empty() {
            return Err(ValidationError::Empty {
                field: "currentPassword",
            });
        }
        let new = check_password("newPassword", self.new_password.unwrap_or_default())?;
        Ok((current, new))
    }
}

fn required_email(raw: Option<&str>) -> Result<String, ValidationError> {
    normalize_email(raw)?.ok_or(ValidationError::Empty { field: "email" })
}

fn check_password(field: &'static str, password: String) -> Result<String, ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be at least 6 characters",
        });
    }
    require_max_len(field, &password, MAX_PASSWORD_LEN)?;
    Ok(password)
}

fn optional(field: &'static str, value: Option<String>) -> Result<Option<String>, ValidationError> {
    let Some(value) = value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    require_max_len(field, &value, MAX_FIELD_LEN)?;
    Ok(Some(value))
}
