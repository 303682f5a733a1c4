//! Account service client and the validation rules its forms share.

use serde::{Deserialize, Serialize};

use crate::core::api::{check_status, decode_json, transport, ApiError};
use crate::core::config::AppConfig;

/// Ticket priority accepted by the support endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 3] =
        [TicketPriority::Low, TicketPriority::Medium, TicketPriority::High];

    /// Wire value, kept in Portuguese as the service expects.
    pub fn wire_value(self) -> &'static str {
        match self {
            TicketPriority::Low => "baixa",
            TicketPriority::Medium => "media",
            TicketPriority::High => "alta",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
        }
    }

    /// Maps a form value back to a priority, defaulting to medium.
    pub fn parse(value: &str) -> Self {
        match value {
            "baixa" => TicketPriority::Low,
            "alta" => TicketPriority::High,
            _ => TicketPriority::Medium,
        }
    }
}

/// A support request as filled in on the form.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportTicket {
    pub subject: String,
    pub content: String,
    pub priority: TicketPriority,
}

/// New account details from the registration form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub cellphone: String,
    pub password: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    cellphone_number: &'a str,
    role: &'static str,
}

#[derive(Serialize)]
struct TicketRequest<'a> {
    subject: &'a str,
    content: &'a str,
    #[serde(rename = "typeRequest")]
    type_request: &'a str,
    priority: &'static str,
}

/// Client for the account service: sign-in, registration, token checks and
/// support tickets.
#[derive(Debug, Clone)]
pub struct AuthClient {
    config: AppConfig,
    http: reqwest::Client,
}

impl AuthClient {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(AppConfig::from_env())
    }

    /// Exchanges credentials for a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.config.auth_url("/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(transport)?;
        let payload: LoginResponse = decode_json(response).await?;
        Ok(payload.token)
    }

    /// Creates an account. Every self-served account gets the `user` role.
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let body = RegisterRequest {
            name: &registration.name,
            email: &registration.email,
            password: &registration.password,
            cellphone_number: &registration.cellphone,
            role: "user",
        };
        let response = self
            .http
            .post(self.config.auth_url("/register"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await?;
        Ok(())
    }

    /// Whether a stored token is still accepted by the service. A rejected
    /// token is `Ok(false)`; only transport problems are errors.
    pub async fn validate_token(&self, token: &str) -> Result<bool, ApiError> {
        let response = self
            .http
            .get(self.config.auth_url("/validate-token"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        Ok(response.status().is_success())
    }

    /// Opens a support ticket on behalf of the signed-in user.
    pub async fn submit_ticket(
        &self,
        token: &str,
        ticket: &SupportTicket,
    ) -> Result<(), ApiError> {
        let body = TicketRequest {
            subject: &ticket.subject,
            content: &ticket.content,
            type_request: &ticket.subject,
            priority: ticket.priority.wire_value(),
        };
        let response = self
            .http
            .post(self.config.auth_url("/support"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await?;
        Ok(())
    }
}

pub const PASSWORD_MIN_CHARS: usize = 8;

/// Mirrors the account service's address check: one `@`, no whitespace and
/// a dot with text on both sides somewhere in the domain.
pub fn email_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn password_meets_minimum(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_CHARS
}

/// Checks the sign-in form, returning the first problem found.
pub fn validate_login(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Fill in your email and password.".to_string());
    }
    if !email_is_valid(email.trim()) {
        return Err("Enter a valid email address.".to_string());
    }
    Ok(())
}

/// Checks the registration form, returning the first problem found.
pub fn validate_registration(registration: &Registration, confirm: &str) -> Result<(), String> {
    if registration.name.trim().is_empty()
        || registration.email.trim().is_empty()
        || registration.cellphone.trim().is_empty()
        || registration.password.is_empty()
    {
        return Err("Fill in all fields.".to_string());
    }
    if !email_is_valid(registration.email.trim()) {
        return Err("Enter a valid email address.".to_string());
    }
    if !password_meets_minimum(&registration.password) {
        return Err(format!(
            "Password must be at least {PASSWORD_MIN_CHARS} characters."
        ));
    }
    if registration.password != confirm {
        return Err("Passwords do not match.".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            name: "Ana Souza".to_string(),
            email: "ana@school.edu".to_string(),
            cellphone: "11988887777".to_string(),
            password: "quietroom".to_string(),
        }
    }

    #[test]
    fn well_formed_addresses_pass() {
        for email in ["ana@school.edu", "a@b.co", "first.last@sub.domain.org"] {
            assert!(email_is_valid(email), "{email} should be valid");
        }
    }

    #[test]
    fn malformed_addresses_fail() {
        for email in [
            "",
            "ana",
            "ana@",
            "@school.edu",
            "ana@school",
            "ana@.edu",
            "ana@school.",
            "ana a@school.edu",
            "ana@@school.edu",
        ] {
            assert!(!email_is_valid(email), "{email} should be invalid");
        }
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login("", "secret123").is_err());
        assert!(validate_login("ana@school.edu", "").is_err());
        assert!(validate_login("not-an-email", "secret123").is_err());
        assert!(validate_login("ana@school.edu", "secret123").is_ok());
    }

    #[test]
    fn registration_checks_run_in_order() {
        let mut reg = registration();
        reg.name.clear();
        assert_eq!(
            validate_registration(&reg, "quietroom"),
            Err("Fill in all fields.".to_string())
        );

        let mut reg = registration();
        reg.email = "nope".to_string();
        assert_eq!(
            validate_registration(&reg, "quietroom"),
            Err("Enter a valid email address.".to_string())
        );

        let mut reg = registration();
        reg.password = "short".to_string();
        assert!(validate_registration(&reg, "short")
            .unwrap_err()
            .contains("at least 8"));

        let reg = registration();
        assert_eq!(
            validate_registration(&reg, "different"),
            Err("Passwords do not match.".to_string())
        );
        assert!(validate_registration(&reg, "quietroom").is_ok());
    }

    #[test]
    fn priorities_round_trip_their_wire_values() {
        for priority in TicketPriority::ALL {
            assert_eq!(TicketPriority::parse(priority.wire_value()), priority);
        }
        assert_eq!(TicketPriority::parse("urgente"), TicketPriority::Medium);
    }

    #[test]
    fn ticket_requests_mirror_the_subject_into_type_request() {
        let body = TicketRequest {
            subject: "Broken spectrogram",
            content: "The image never loads.",
            type_request: "Broken spectrogram",
            priority: TicketPriority::High.wire_value(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["typeRequest"], json["subject"]);
        assert_eq!(json["priority"], "alta");
    }
}
