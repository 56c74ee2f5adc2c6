// Token lifecycle shared by every outbound photo-library call
mod error;
mod gateway;
mod provider;
mod token;

pub use error::{AuthError, ProviderError};
pub use gateway::{AuthGateway, AuthState, GatewayConfig, SignInOptions};
pub use provider::{Prompt, ProviderConfig, TokenCallback, TokenGrant, TokenProvider, TokenRequest};
pub use token::{Token, TokenStore, DEFAULT_TOKEN_TTL};

// Desktop stand-in for the identity provider's popup widget
#[cfg(feature = "browser")]
pub mod browser;
