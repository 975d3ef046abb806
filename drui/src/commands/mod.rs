use crate::context::AppContext;
use libdrui::{DruiError, Registry, RequestContext};
use std::io::{self, BufRead, Write};

/// Delete command handler
pub mod delete;

/// Login command handler
pub mod login;

/// Repository listing
pub mod repos;

/// Image details
pub mod show;

/// Tag listing
pub mod tags;

/// Version command handlers
pub mod version;

/// Turns a library error into the message shown to the user
pub fn describe_error(err: &DruiError) -> String {
    match err {
        DruiError::Unauthorized { .. } => {
            "Unauthorized: the registry rejected the request. Log in again with --username."
                .to_string()
        }
        DruiError::Unavailable { .. } => {
            format!("{}. Check registry.endpoint or DRUI_REGISTRY_ENDPOINT.", err)
        }
        _ => err.to_string(),
    }
}

/// Creates the registry client and logs in when credentials were given
pub(crate) async fn connect(ctx: &AppContext) -> Result<(Registry, RequestContext), String> {
    let registry = ctx.registry().map_err(|e| describe_error(&e))?;
    let request_ctx = ctx
        .request_context(&registry)
        .await
        .map_err(|e| describe_error(&e))?;
    Ok((registry, request_ctx))
}

/// Prompt for username on stdin
pub fn prompt_username() -> Result<String, String> {
    print!("Username: ");
    io::stdout()
        .flush()
        .map_err(|e| format!("Failed to flush stdout: {}", e))?;

    let mut username = String::new();
    io::stdin()
        .read_line(&mut username)
        .map_err(|e| format!("Failed to read username: {}", e))?;

    Ok(username.trim().to_string())
}

/// Prompt for password if not provided
pub fn prompt_password(provided_password: Option<String>) -> Result<String, String> {
    match provided_password {
        Some(password) => Ok(password),
        None => rpassword::prompt_password("Password: ")
            .map_err(|e| format!("Failed to read password: {}", e)),
    }
}

/// Asks a yes/no question; anything but `y` is a no
pub fn confirm(question: &str, input: &mut impl BufRead) -> Result<bool, String> {
    print!("{} [y/N]: ", question);
    io::stdout()
        .flush()
        .map_err(|e| format!("Failed to flush stdout: {}", e))?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| format!("Failed to read answer: {}", e))?;

    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
