//! # Identity Module
//!
//! Sign-up, sign-in and token management against the Cognito user pool that
//! guards the catalog API. Only the pool's public JSON operations are used, the
//! same ones a browser client calls, so no AWS signing is involved.
//!
//! ## Sign-in Flow
//!
//! 1. **Password sign-in**: `InitiateAuth` with `USER_PASSWORD_AUTH`
//! 2. **Challenge**: an admin-created account must set a new password first
//!    (`NEW_PASSWORD_REQUIRED`), answered with `RespondToAuthChallenge`
//! 3. **Unconfirmed account**: sign-in is refused until the emailed code is
//!    confirmed with `ConfirmSignUp`
//! 4. **Refresh**: `InitiateAuth` with `REFRESH_TOKEN_AUTH` renews the id and
//!    access tokens without asking for the password again
//!
//! The id token is what the catalog API expects as bearer token; its
//! `custom:role` claim carries the user's role (`"1"` for admins).

mod cognito;

pub use cognito::{IdentityProvider, SignInStep, UserProfile};

pub const ROLE_CLAIM: &str = "custom:role";
pub const ADMIN_ROLE: &str = "1";
pub const LISTENER_ROLE: &str = "0";
