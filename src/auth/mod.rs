//! Authentication module for the DataCrunch client.
//!
//! Access tokens are obtained with the OAuth2 client-credentials grant and
//! cached by a [`TokenManager`] until shortly before they expire.

mod manager;
mod token;

pub use manager::{OAuth2TokenManager, TokenManager};
pub use token::{Token, TokenResponse};
