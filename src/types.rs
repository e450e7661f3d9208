//! User model, request inputs, and backend wire payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// USER
// =============================================================================

/// The current user as returned by the backend.
///
/// Only the commonly used fields are typed; everything else the server sends
/// is kept in `extra` and serialized back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric on some deployments, a string on others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// INPUTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form. `company` is collected but not sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company: String,
    pub country: String,
    pub phone: String,
}

impl SignUpForm {
    /// Phone number as the backend stores it: `"<country> <phone>"`.
    #[must_use]
    pub fn full_phone(&self) -> String {
        format!("{} {}", self.country, self.phone)
    }
}

// =============================================================================
// WIRE — requests
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    #[serde(rename = "DadosLogin")]
    pub login: LoginData<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginData<'a> {
    #[serde(rename = "Usuario")]
    pub email: &'a str,
    #[serde(rename = "Senha")]
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenLoginRequest<'a> {
    #[serde(rename = "DadosLogin")]
    pub login: TokenLoginData<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenLoginData<'a> {
    #[serde(rename = "Token")]
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    #[serde(rename = "Registro")]
    pub registration: Registration<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Registration<'a> {
    #[serde(rename = "Nome")]
    pub name: &'a str,
    #[serde(rename = "Email")]
    pub email: &'a str,
    #[serde(rename = "Senha")]
    pub password: &'a str,
    #[serde(rename = "Telefone")]
    pub phone: String,
}

impl<'a> RegisterRequest<'a> {
    pub(crate) fn from_form(form: &'a SignUpForm) -> Self {
        Self {
            registration: Registration {
                name: &form.name,
                email: &form.email,
                password: &form.password,
                phone: form.full_phone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UserUpdateRequest<'a> {
    pub user: &'a User,
}

// =============================================================================
// WIRE — responses
// =============================================================================

/// Access token from an auth response (`Data.Token`).
pub(crate) fn response_token(response: &Value) -> Option<&str> {
    response
        .pointer("/Data/Token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

/// User object from an auth response (`user`), when present and decodable.
pub(crate) fn response_user(response: &Value) -> Option<User> {
    match response.get("user") {
        None | Some(Value::Null) => None,
        Some(user) => serde_json::from_value(user.clone()).ok(),
    }
}

/// Result code from a registration response (`Result.Code`).
pub(crate) fn response_code(response: &Value) -> Option<i64> {
    response.pointer("/Result/Code").and_then(Value::as_i64)
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
