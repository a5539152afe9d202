// Signs in to the auth server and prints the session cookie, for use with curl:
//
//     curl http://localhost:5173/projects -b "$(get-cookie)"

use clap::Parser;
use reqwest::{StatusCode, header};
use serde::Serialize;
use thiserror::Error;

const DEFAULT_EMAIL: &str = "admin@example.com";
const DEFAULT_PASSWORD: &str = "admin";
const SIGN_IN_PATH: &str = "/api/auth/sign-in/email";

/// Get a session cookie for curl requests
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Account email.
    #[arg(default_value = DEFAULT_EMAIL)]
    email: String,

    /// Account password.
    #[arg(default_value = DEFAULT_PASSWORD)]
    password: String,

    /// Base URL of the auth server.
    #[arg(long, env = "BETTER_AUTH_URL", default_value = "http://localhost:5173")]
    base_url: String,
}

#[derive(Serialize)]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Error)]
enum LoginError {
    #[error("Login failed: {0}")]
    Rejected(StatusCode),
    #[error("Connection failed: {0}")]
    Connection(#[source] reqwest::Error),
    #[error("No cookie in response")]
    MissingCookie,
}

/// `name=value` part of a `Set-Cookie` header, without attributes.
fn first_cookie_pair(set_cookie: &str) -> Option<&str> {
    let pair = set_cookie.split(';').next()?.trim();
    (!pair.is_empty()).then_some(pair)
}

async fn get_cookie(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<String, LoginError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), SIGN_IN_PATH);

    let response = client
        .post(&url)
        .json(&SignInBody { email, password })
        .send()
        .await
        .map_err(LoginError::Connection)?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoginError::Rejected(status));
    }

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(first_cookie_pair)
        .map(str::to_string)
        .ok_or(LoginError::MissingCookie)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let client = reqwest::Client::new();

    match get_cookie(&client, &args.base_url, &args.email, &args.password).await {
        Ok(cookie) => println!("{}", cookie),
        Err(err) => {
            eprintln!("{}", err);
            if matches!(err, LoginError::Connection(_)) {
                eprintln!("Is the dev server running at {}?", args.base_url);
            }
            std::process::exit(1);
        }
    }
}
