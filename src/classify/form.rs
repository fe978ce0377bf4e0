//! Form purpose classification
//!
//! Single-signal heuristics over-fire on real-world markup (every newsletter
//! box has an email field, every docs page has a search box), so form types
//! are decided by an ordered cascade of named rules. A later rule only gets a
//! say when every earlier, higher-confidence rule abstained.

use crate::classify::{pattern, PageRole};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static CHECKOUT_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"checkout|payment|billing|card|결제|pay now|place order"));
static SEARCH_KEYWORD: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bsearch\b|검색|찾기"));
static SEARCH_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| pattern(r"search|검색|찾기"));
static GENERIC_SEARCH_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"global search|site search|repository search"));
static CONTACT_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"contact us|문의하기|고객센터|support request"));
static MESSAGE_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"message us|send message|문의 내용|연락처"));
static CONTACT_FIELDS: LazyLock<Regex> = LazyLock::new(|| pattern(r"name|email|phone|message"));
static SIGNUP_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"signup|sign up|register|create account|join|회원가입"));
static LOGIN_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"login|log in|signin|sign in|auth|로그인"));
static VERIFICATION_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"remember me|2fa|otp|verification"));

/// The purpose a form serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormType {
    Login,
    Signup,
    Contact,
    Checkout,
    Search,
    Unknown,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Signup => "SIGNUP",
            Self::Contact => "CONTACT",
            Self::Checkout => "CHECKOUT",
            Self::Search => "SEARCH",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the rendering backend reports about one `<form>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub id: String,
    pub action: String,
    /// Visible text inside the form
    pub text: String,
    /// `type` attribute of every input, defaulting to "text"
    pub input_types: Vec<String>,
    /// Non-empty `name` attributes
    pub input_names: Vec<String>,
    /// Non-empty `placeholder` attributes
    pub placeholders: Vec<String>,
    /// The form contains a `<textarea>`
    pub has_multiline_field: bool,
    /// Text of submit buttons
    pub submit_text: String,
}

/// Evidence that a form is a search box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSignal {
    Keyword,
    SearchInputType,
    QueryName,
    SearchPlaceholder,
    GenericSearchPhrase,
}

/// Evidence that a form is a contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSignal {
    MultilineField,
    ContactPhrase,
    MessagePhrase,
    ContactFields,
}

/// Everything the cascade looks at, computed once per form
#[derive(Debug, Clone)]
pub struct FormEvidence {
    pub role: PageRole,
    /// Lowercased `id action text submit_text`
    pub haystack: String,
    pub has_password: bool,
    pub has_email: bool,
    pub has_multiline_field: bool,
    pub search: Vec<SearchSignal>,
    pub contact: Vec<ContactSignal>,
}

impl FormEvidence {
    pub fn gather(form: &FormSnapshot, role: PageRole) -> Self {
        let haystack =
            format!("{} {} {} {}", form.id, form.action, form.text, form.submit_text).to_lowercase();
        let types: Vec<String> = form.input_types.iter().map(|t| t.to_lowercase()).collect();
        let has_password = types.iter().any(|t| t == "password");
        let has_email = types.iter().any(|t| t == "email");

        let mut search = Vec::new();
        if SEARCH_KEYWORD.is_match(&haystack) {
            search.push(SearchSignal::Keyword);
        }
        if types.iter().any(|t| t == "search") {
            search.push(SearchSignal::SearchInputType);
        }
        if form.input_names.iter().map(|n| n.to_lowercase()).any(|n| {
            n == "q" || n.contains("search") || n.contains("query")
        }) {
            search.push(SearchSignal::QueryName);
        }
        if form
            .placeholders
            .iter()
            .any(|p| SEARCH_PLACEHOLDER.is_match(&p.to_lowercase()))
        {
            search.push(SearchSignal::SearchPlaceholder);
        }
        if GENERIC_SEARCH_PHRASE.is_match(&haystack) {
            search.push(SearchSignal::GenericSearchPhrase);
        }

        let mut contact = Vec::new();
        if form.has_multiline_field {
            contact.push(ContactSignal::MultilineField);
        }
        if CONTACT_PHRASE.is_match(&haystack) {
            contact.push(ContactSignal::ContactPhrase);
        }
        if MESSAGE_PHRASE.is_match(&haystack) {
            contact.push(ContactSignal::MessagePhrase);
        }
        if CONTACT_FIELDS.is_match(&haystack) && !has_password {
            contact.push(ContactSignal::ContactFields);
        }

        Self {
            role,
            haystack,
            has_password,
            has_email,
            has_multiline_field: form.has_multiline_field,
            search,
            contact,
        }
    }

    fn search_count(&self) -> usize {
        self.search.len()
    }

    fn contact_count(&self) -> usize {
        self.contact.len()
    }
}

/// One step of the form cascade
pub struct FormRule {
    pub name: &'static str,
    pub applies: fn(&FormEvidence) -> bool,
    pub outcome: FormType,
}

/// The form cascade, highest confidence first
pub static FORM_RULES: &[FormRule] = &[
    FormRule {
        name: "checkout-intent",
        applies: |e| e.role == PageRole::Checkout || CHECKOUT_PHRASE.is_match(&e.haystack),
        outcome: FormType::Checkout,
    },
    FormRule {
        name: "login-page-password",
        applies: |e| e.role == PageRole::Login && e.has_password,
        outcome: FormType::Login,
    },
    FormRule {
        name: "multiline-field",
        applies: |e| e.has_multiline_field,
        outcome: FormType::Contact,
    },
    FormRule {
        name: "reading-page-search",
        applies: |e| {
            matches!(e.role, PageRole::Docs | PageRole::Blog)
                && e.search_count() >= 1
                && e.contact_count() == 0
        },
        outcome: FormType::Search,
    },
    FormRule {
        name: "support-page-contact",
        applies: |e| e.role == PageRole::Support && e.contact_count() >= 1,
        outcome: FormType::Contact,
    },
    FormRule {
        name: "search-majority",
        applies: |e| e.search_count() >= 2 && e.contact_count() <= 1,
        outcome: FormType::Search,
    },
    FormRule {
        name: "contact-majority",
        applies: |e| e.contact_count() >= 2,
        outcome: FormType::Contact,
    },
    FormRule {
        name: "email-contact",
        applies: |e| {
            e.contact_count() == 1 && e.search_count() == 0 && e.has_email && !e.has_password
        },
        outcome: FormType::Contact,
    },
    FormRule {
        name: "password-signup",
        applies: |e| e.has_password && SIGNUP_PHRASE.is_match(&e.haystack),
        outcome: FormType::Signup,
    },
    FormRule {
        name: "password-login",
        applies: |e| e.has_password && LOGIN_PHRASE.is_match(&e.haystack),
        outcome: FormType::Login,
    },
    FormRule {
        name: "password-email-verification",
        applies: |e| e.has_password && e.has_email && VERIFICATION_PHRASE.is_match(&e.haystack),
        outcome: FormType::Login,
    },
    FormRule {
        name: "search-fallback",
        applies: |e| e.search_count() >= 1 && !e.has_password && e.contact_count() == 0,
        outcome: FormType::Search,
    },
];

/// Returns the first cascade rule that fires for this form, if any
pub fn matching_form_rule(form: &FormSnapshot, role: PageRole) -> Option<&'static FormRule> {
    let evidence = FormEvidence::gather(form, role);
    FORM_RULES.iter().find(|rule| (rule.applies)(&evidence))
}

/// Classifies the purpose of a form found on a page with the given role
pub fn classify_form_type(form: &FormSnapshot, role: PageRole) -> FormType {
    match matching_form_rule(form, role) {
        Some(rule) => {
            tracing::trace!("Form '{}' matched rule {}", form.id, rule.name);
            rule.outcome
        }
        None => FormType::Unknown,
    }
}
