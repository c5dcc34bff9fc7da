use std::collections::BTreeMap;

use chrono::Utc;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    config::IdentitySettings,
    error::{CatalogError, Result},
    identity::{ADMIN_ROLE, LISTENER_ROLE, ROLE_CLAIM},
    types::Session,
    utils,
};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

/// Where a sign-in attempt ended up.
#[derive(Debug)]
pub enum SignInStep {
    /// Tokens were issued.
    Done(Session),
    /// The account must choose a new password before tokens are issued.
    NewPasswordRequired { session: String },
    /// The account exists but its email address was never confirmed.
    ConfirmSignUp,
}

/// The signed-in user's attributes.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub username: String,
    pub attributes: BTreeMap<String, String>,
}

impl UserProfile {
    pub fn name(&self) -> &str {
        self.attributes
            .get("name")
            .map(String::as_str)
            .unwrap_or(&self.username)
    }

    pub fn email(&self) -> Option<&str> {
        self.attributes.get("email").map(String::as_str)
    }

    pub fn role(&self) -> Option<&str> {
        self.attributes.get(ROLE_CLAIM).map(String::as_str)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(ADMIN_ROLE)
    }

    /// Builds a profile from the claims of an id token.
    pub fn from_id_token(token: &str) -> Result<Self> {
        let claims = utils::decode_jwt_claims(token)?;
        let Value::Object(map) = claims else {
            return Err(CatalogError::Auth("identity token has no claims".to_string()));
        };

        let attributes: BTreeMap<String, String> = map
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect();
        let username = attributes
            .get("cognito:username")
            .or_else(|| attributes.get("sub"))
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            username,
            attributes,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
    session: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: String,
    access_token: String,
    refresh_token: Option<String>,
    expires_in: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserResponse {
    username: String,
    #[serde(default)]
    user_attributes: Vec<AttributeType>,
}

/// Client for the user pool's public operations.
#[derive(Clone)]
pub struct IdentityProvider {
    http: Client,
    settings: IdentitySettings,
}

impl IdentityProvider {
    pub fn new(settings: IdentitySettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    /// Registers a listener account. The pool emails a confirmation code.
    pub async fn sign_up(&self, username: &str, password: &str, email: &str) -> Result<()> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(CatalogError::Validation(
                "Username and password are required".to_string(),
            ));
        }
        if !utils::is_valid_email(email) {
            return Err(CatalogError::Validation("Invalid email address".to_string()));
        }

        let _: Value = self
            .call(
                "SignUp",
                json!({
                    "ClientId": self.settings.client_id,
                    "Username": username,
                    "Password": password,
                    "UserAttributes": [
                        { "Name": "email", "Value": email },
                        { "Name": "name", "Value": username },
                        { "Name": ROLE_CLAIM, "Value": LISTENER_ROLE },
                    ],
                }),
            )
            .await?;
        Ok(())
    }

    pub async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<()> {
        let _: Value = self
            .call(
                "ConfirmSignUp",
                json!({
                    "ClientId": self.settings.client_id,
                    "Username": username,
                    "ConfirmationCode": code.trim(),
                }),
            )
            .await?;
        Ok(())
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> Result<SignInStep> {
        let response = self
            .call::<InitiateAuthResponse>(
                "InitiateAuth",
                json!({
                    "AuthFlow": "USER_PASSWORD_AUTH",
                    "ClientId": self.settings.client_id,
                    "AuthParameters": { "USERNAME": username, "PASSWORD": password },
                }),
            )
            .await;

        match response {
            Ok(response) => self.sign_in_step(username, response),
            Err(CatalogError::Auth(message)) if message.starts_with("UserNotConfirmedException") => {
                Ok(SignInStep::ConfirmSignUp)
            }
            Err(e) => Err(e),
        }
    }

    /// Answers the new-password challenge returned by [`sign_in`](Self::sign_in).
    pub async fn complete_new_password(
        &self,
        username: &str,
        new_password: &str,
        session: &str,
    ) -> Result<SignInStep> {
        let response: InitiateAuthResponse = self
            .call(
                "RespondToAuthChallenge",
                json!({
                    "ChallengeName": "NEW_PASSWORD_REQUIRED",
                    "ClientId": self.settings.client_id,
                    "Session": session,
                    "ChallengeResponses": { "USERNAME": username, "NEW_PASSWORD": new_password },
                }),
            )
            .await?;
        self.sign_in_step(username, response)
    }

    /// Exchanges a refresh token for fresh id and access tokens. The refresh
    /// token itself is kept when the pool does not rotate it.
    pub async fn refresh(&self, session: &Session) -> Result<Session> {
        let response: InitiateAuthResponse = self
            .call(
                "InitiateAuth",
                json!({
                    "AuthFlow": "REFRESH_TOKEN_AUTH",
                    "ClientId": self.settings.client_id,
                    "AuthParameters": { "REFRESH_TOKEN": session.refresh_token },
                }),
            )
            .await?;

        let result = response
            .authentication_result
            .ok_or_else(|| CatalogError::Auth("token refresh returned no tokens".to_string()))?;
        Ok(Session {
            username: session.username.clone(),
            id_token: result.id_token,
            access_token: result.access_token,
            refresh_token: result
                .refresh_token
                .unwrap_or_else(|| session.refresh_token.clone()),
            expires_in: result.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    /// Revokes every token issued to the user.
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let _: Value = self
            .call("GlobalSignOut", json!({ "AccessToken": access_token }))
            .await?;
        Ok(())
    }

    pub async fn user_attributes(&self, access_token: &str) -> Result<UserProfile> {
        let response: GetUserResponse = self
            .call("GetUser", json!({ "AccessToken": access_token }))
            .await?;
        Ok(UserProfile {
            username: response.username,
            attributes: response
                .user_attributes
                .into_iter()
                .map(|a| (a.name, a.value))
                .collect(),
        })
    }

    pub async fn update_user_attributes(
        &self,
        access_token: &str,
        attributes: &[(&str, &str)],
    ) -> Result<()> {
        if let Some((_, email)) = attributes.iter().find(|(name, _)| *name == "email") {
            if !utils::is_valid_email(email) {
                return Err(CatalogError::Validation("Invalid email address".to_string()));
            }
        }
        let attributes: Vec<AttributeType> = attributes
            .iter()
            .map(|(name, value)| AttributeType {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect();

        let _: Value = self
            .call(
                "UpdateUserAttributes",
                json!({ "AccessToken": access_token, "UserAttributes": attributes }),
            )
            .await?;
        Ok(())
    }

    pub async fn change_password(
        &self,
        access_token: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let _: Value = self
            .call(
                "ChangePassword",
                json!({
                    "AccessToken": access_token,
                    "PreviousPassword": old_password,
                    "ProposedPassword": new_password,
                }),
            )
            .await?;
        Ok(())
    }

    fn sign_in_step(&self, username: &str, response: InitiateAuthResponse) -> Result<SignInStep> {
        if let Some(result) = response.authentication_result {
            let refresh_token = result.refresh_token.ok_or_else(|| {
                CatalogError::Auth("sign-in returned no refresh token".to_string())
            })?;
            return Ok(SignInStep::Done(Session {
                username: username.to_string(),
                id_token: result.id_token,
                access_token: result.access_token,
                refresh_token,
                expires_in: result.expires_in,
                obtained_at: Utc::now().timestamp() as u64,
            }));
        }

        match (response.challenge_name.as_deref(), response.session) {
            (Some("NEW_PASSWORD_REQUIRED"), Some(session)) => {
                Ok(SignInStep::NewPasswordRequired { session })
            }
            (Some(other), _) => Err(CatalogError::Auth(format!(
                "unsupported sign-in challenge {}",
                other
            ))),
            (None, _) => Err(CatalogError::Auth("sign-in returned no tokens".to_string())),
        }
    }

    /// Invokes one user pool operation. Service errors become
    /// `CatalogError::Auth("<ErrorType>: <message>")`.
    async fn call<T: DeserializeOwned>(&self, operation: &str, body: Value) -> Result<T> {
        debug!(operation, "identity provider call");

        let response = self
            .http
            .post(&self.settings.endpoint)
            .header(CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, operation))
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
            return Ok(serde_json::from_str(body)?);
        }

        let error: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        let kind = error
            .get("__type")
            .and_then(Value::as_str)
            .map(|t| t.rsplit('#').next().unwrap_or(t))
            .unwrap_or("UnknownError");
        let message = error
            .get("message")
            .or_else(|| error.get("Message"))
            .and_then(Value::as_str)
            .unwrap_or("request was rejected");
        Err(CatalogError::Auth(format!("{}: {}", kind, message)))
    }
}
