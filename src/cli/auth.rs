use std::sync::Arc;

use crate::{
    cli::Context,
    error::{CatalogError, Result},
    identity::{SignInStep, UserProfile},
    info,
    management::SessionManager,
    success, warning,
};

/// Account operations, mirroring the `auth` subcommands.
#[derive(Debug, Clone)]
pub enum AuthAction {
    SignUp {
        username: String,
        email: String,
        password: String,
    },
    Confirm {
        username: String,
        code: String,
    },
    SignIn {
        username: String,
        password: String,
        new_password: Option<String>,
    },
    SignOut,
    WhoAmI,
    Update {
        name: Option<String>,
        email: Option<String>,
    },
    Password {
        old_password: String,
        new_password: String,
    },
}

pub async fn auth(ctx: &mut Context, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::SignUp {
            username,
            email,
            password,
        } => {
            ctx.identity.sign_up(&username, &password, &email).await?;
            success!("Account created. Check {} for your confirmation code.", email);
            info!("Then run: dreamstreamer auth confirm --username {} --code <code>", username);
        }
        AuthAction::Confirm { username, code } => {
            ctx.identity.confirm_sign_up(&username, &code).await?;
            success!("Account confirmed. You can sign in now.");
        }
        AuthAction::SignIn {
            username,
            password,
            new_password,
        } => sign_in(ctx, &username, &password, new_password.as_deref()).await?,
        AuthAction::SignOut => {
            let Some(session) = ctx.session.take() else {
                info!("Not signed in.");
                return Ok(());
            };
            if let Err(e) = ctx.identity.sign_out(&session.current().await.access_token).await {
                warning!("Could not revoke the session remotely: {}", e.user_message());
            }
            session.forget().await?;
            ctx.auth.signed_out();
            success!("Signed out.");
        }
        AuthAction::WhoAmI => {
            let profile = match &ctx.session {
                Some(session) => {
                    let current = session.valid_session().await?;
                    ctx.identity.user_attributes(&current.access_token).await?
                }
                None => ctx.auth.require_signed_in()?.clone(),
            };
            print_profile(&profile, ctx.auth.is_admin());
        }
        AuthAction::Update { name, email } => {
            let session = require_session(ctx)?;
            let mut attributes: Vec<(&str, &str)> = Vec::new();
            if let Some(name) = name.as_deref() {
                attributes.push(("name", name));
            }
            if let Some(email) = email.as_deref() {
                attributes.push(("email", email));
            }
            if attributes.is_empty() {
                return Err(CatalogError::Validation(
                    "Nothing to update. Pass --name and/or --email".to_string(),
                ));
            }

            let current = session.valid_session().await?;
            ctx.identity
                .update_user_attributes(&current.access_token, &attributes)
                .await?;
            success!("Profile updated.");
            if email.is_some() {
                info!("A confirmation code was sent to the new address.");
            }
        }
        AuthAction::Password {
            old_password,
            new_password,
        } => {
            let session = require_session(ctx)?;
            let current = session.valid_session().await?;
            ctx.identity
                .change_password(&current.access_token, &old_password, &new_password)
                .await?;
            success!("Password changed.");
        }
    }

    Ok(())
}

async fn sign_in(
    ctx: &mut Context,
    username: &str,
    password: &str,
    new_password: Option<&str>,
) -> Result<()> {
    let mut step = ctx.identity.sign_in(username, password).await?;

    if let SignInStep::NewPasswordRequired { session } = &step {
        let Some(new_password) = new_password else {
            return Err(CatalogError::Auth(
                "a new password is required for this account. Retry with --new-password"
                    .to_string(),
            ));
        };
        step = ctx
            .identity
            .complete_new_password(username, new_password, session)
            .await?;
    }

    let session = match step {
        SignInStep::Done(session) => session,
        SignInStep::ConfirmSignUp => {
            return Err(CatalogError::Auth(format!(
                "account not confirmed yet. Run dreamstreamer auth confirm --username {} --code <code>",
                username
            )));
        }
        SignInStep::NewPasswordRequired { .. } => {
            return Err(CatalogError::Auth(
                "the new password was not accepted".to_string(),
            ));
        }
    };

    let profile = UserProfile::from_id_token(&session.id_token)?;
    let manager = Arc::new(SessionManager::new(session, ctx.identity.clone()));
    manager.persist().await?;

    ctx.catalog = ctx.catalog.clone().with_credentials(manager.clone());
    ctx.session = Some(manager);
    ctx.auth.signed_in(profile);

    success!(
        "Signed in as {}{}",
        username,
        if ctx.auth.is_admin() { " (admin)" } else { "" }
    );
    Ok(())
}

fn require_session(ctx: &Context) -> Result<Arc<SessionManager>> {
    ctx.session.clone().ok_or_else(|| {
        CatalogError::Auth("not signed in. Please run dreamstreamer auth sign-in".to_string())
    })
}

fn print_profile(profile: &UserProfile, is_admin: bool) {
    info!("User:  {}", profile.username);
    info!("Name:  {}", profile.name());
    if let Some(email) = profile.email() {
        info!("Email: {}", email);
    }
    info!("Role:  {}", if is_admin { "admin" } else { "listener" });
}
