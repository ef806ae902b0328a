//! Login, logout and whoami.

use anyhow::{Result, bail};
use minecam_client::ClientError;
use minecam_core::PublicUser;

use crate::bootstrap::ClientContext;
use crate::parser::ClientArgs;
use crate::utils::input::{prompt_string_with_default, value_or_prompt};

/// `Full Name (username)` or just the username.
fn describe(user: &PublicUser) -> String {
    match &user.full_name {
        Some(name) if !name.is_empty() => format!("{name} ({})", user.username),
        _ => user.username.clone(),
    }
}

/// Log in and save the token.
pub async fn login(
    args: &ClientArgs,
    username: Option<String>,
    password: Option<String>,
    remember: bool,
) -> Result<()> {
    let mut ctx = ClientContext::open(args)?;

    let username = match username {
        Some(name) => name,
        None => prompt_string_with_default("Username", ctx.session.remembered_user())?,
    };
    if username.is_empty() {
        bail!("Username must not be empty");
    }
    let password = value_or_prompt(password, "Password")?;

    let login = ctx.api.login(&username, &password).await.map_err(|e| match e {
        // 401 here means bad credentials, not an expired session
        ClientError::Http { status: 401, .. } => {
            anyhow::anyhow!("Incorrect username or password")
        }
        other => other.into(),
    })?;
    ctx.session.save_login(&login, remember)?;

    println!("Logged in as {}", describe(&login.user));
    if !login.user.is_active {
        println!("Warning: this account is disabled");
    }
    Ok(())
}

/// Tell the server and forget the saved session.
pub async fn logout(args: &ClientArgs) -> Result<()> {
    let mut ctx = ClientContext::open(args)?;
    if !ctx.session.is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }

    if let Err(e) = ctx.authorized()?.logout().await {
        tracing::warn!(error = %e, "Server logout failed, clearing local session anyway");
    }
    ctx.session.clear()?;
    println!("Logged out");
    Ok(())
}

/// Show the user the saved token belongs to.
pub async fn whoami(args: &ClientArgs) -> Result<()> {
    let mut ctx = ClientContext::open(args)?;
    let user = match ctx.authorized()?.current_user().await {
        Ok(user) => user,
        Err(e) if e.is_unauthorized() => {
            ctx.session.clear()?;
            bail!("{e}");
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", describe(&user));
    if let Some(email) = &user.email {
        println!("email:  {email}");
    }
    println!("role:   {}", user.role);
    println!("active: {}", user.is_active);
    Ok(())
}
