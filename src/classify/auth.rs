use crate::classify::pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static LOGIN_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"login|signin|auth|account|dashboard|admin"));

/// An observation suggesting a page sits behind authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthSignal {
    #[serde(rename = "password-input")]
    PasswordInput,
    #[serde(rename = "login-keyword")]
    LoginKeyword,
    #[serde(rename = "redirect-to-login")]
    RedirectToLogin,
    #[serde(rename = "http-401")]
    Http401,
    #[serde(rename = "http-403")]
    Http403,
    #[serde(rename = "access-denied-text")]
    AccessDeniedText,
}

/// How much a single signal is trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalStrength {
    /// Establishes an auth gate on its own
    Strong,
    /// Needs a second weak signal as corroboration
    Weak,
}

impl AuthSignal {
    pub fn strength(&self) -> SignalStrength {
        match self {
            Self::PasswordInput | Self::RedirectToLogin | Self::Http401 | Self::Http403 => {
                SignalStrength::Strong
            }
            Self::LoginKeyword | Self::AccessDeniedText => SignalStrength::Weak,
        }
    }

    pub fn is_strong(&self) -> bool {
        self.strength() == SignalStrength::Strong
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PasswordInput => "password-input",
            Self::LoginKeyword => "login-keyword",
            Self::RedirectToLogin => "redirect-to-login",
            Self::Http401 => "http-401",
            Self::Http403 => "http-403",
            Self::AccessDeniedText => "access-denied-text",
        }
    }
}

/// Raw per-page observations feeding the auth detector
#[derive(Debug, Clone, Default)]
pub struct AuthObservation<'a> {
    /// A password input is present on the page
    pub password_input: bool,
    /// The URL the navigation landed on, after redirects
    pub final_url: &'a str,
    /// HTTP status of the navigation, 0 when unknown
    pub http_status: u16,
    /// Text such as "access denied" or "members only" is present
    pub access_denied_text: bool,
}

/// The auth verdict for a page, with every signal that was matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthAssessment {
    pub likely: bool,
    pub signals: Vec<AuthSignal>,
}

impl AuthAssessment {
    pub fn strong_count(&self) -> usize {
        self.signals.iter().filter(|s| s.is_strong()).count()
    }

    pub fn weak_count(&self) -> usize {
        self.signals.len() - self.strong_count()
    }
}

/// Decides whether a page is likely gated behind authentication
///
/// A page is auth-likely when at least one strong signal is present, or when
/// two weak signals corroborate each other.
pub fn assess_auth(observation: &AuthObservation<'_>) -> AuthAssessment {
    let mut signals = Vec::new();
    let final_url = observation.final_url.to_lowercase();

    if observation.password_input {
        signals.push(AuthSignal::PasswordInput);
    }
    if LOGIN_KEYWORD.is_match(&final_url) {
        signals.push(AuthSignal::LoginKeyword);
    }
    if final_url.contains("login") {
        signals.push(AuthSignal::RedirectToLogin);
    }
    match observation.http_status {
        401 => signals.push(AuthSignal::Http401),
        403 => signals.push(AuthSignal::Http403),
        _ => {}
    }
    if observation.access_denied_text {
        signals.push(AuthSignal::AccessDeniedText);
    }

    let mut assessment = AuthAssessment {
        likely: false,
        signals,
    };
    assessment.likely = assessment.strong_count() >= 1 || assessment.weak_count() >= 2;
    assessment
}
