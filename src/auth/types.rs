//! Auth configuration types

use crate::types::AuthScheme;

/// Authentication configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication (GitHub allows 60 requests per hour)
    #[default]
    None,

    /// Personal access token sent as `Authorization: token <token>`
    Token {
        /// The access token
        token: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// Build the auth config for a token using the given scheme
    pub fn from_token(token: impl Into<String>, scheme: AuthScheme) -> Self {
        let token = token.into();
        match scheme {
            AuthScheme::Token => Self::Token { token },
            AuthScheme::Bearer => Self::Bearer { token },
        }
    }

    /// Whether requests will carry credentials
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

// Credentials never end up in logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Token { .. } => f.write_str("Token { .. }"),
            Self::Bearer { .. } => f.write_str("Bearer { .. }"),
        }
    }
}
