//! OAuth2 / OIDC pieces of the login flow
//!
//! Authorization request construction, the code-for-token exchange, and JWT
//! claim decoding.

pub mod authorize;
pub mod claims;
pub mod token_exchange;

pub use authorize::{start_login, AuthorizationRequest};
pub use claims::{claim_key, decode_claims, Claims};
pub use token_exchange::{
    parse_token_response, HttpTokenClient, TokenBundle, TokenClient, TokenRequest,
};
