use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    config::{self, Config},
    error,
    management::TokenManager,
    server::start_api_server,
    success,
    types::{PkceToken, Token},
    utils, warning,
};

/// Runs the complete OAuth authorization-code flow against Spotify.
///
/// The flow combines a confidential client (client id + secret on the token
/// request) with PKCE:
/// 1. generate a PKCE code verifier and challenge
/// 2. start the local callback server
/// 3. open the authorization URL in the user's browser
/// 4. wait for the callback handler to exchange the code for a token
/// 5. persist the token for future unattended runs
///
/// Browser launch failures degrade to printing the URL for manual
/// navigation. A timeout or failed exchange terminates the program; the
/// sync command itself never reaches this code path and instead fails fast
/// when no cached token exists.
pub async fn auth(cfg: &Config, shared_state: Arc<Mutex<Option<PkceToken>>>) {
    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    // start API server
    let server_state = Arc::clone(&shared_state);
    let server_cfg = cfg.clone();
    tokio::spawn(async move {
        start_api_server(server_cfg, server_state).await;
    });

    // Construct the authorization URL
    let auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        auth_url = config::SPOTIFY_AUTH_URL,
        client_id = &cfg.client_id,
        redirect_uri = &cfg.redirect_uri,
        code_challenge = code_challenge,
        scope = config::SPOTIFY_SCOPE
    );

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier: code_verifier.clone(),
            token: None,
        });
    }

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    // wait for callback to be hit
    let token = wait_for_token(shared_state).await;

    match token {
        Some(t) => {
            let token_manager = TokenManager::new(t.clone(), cfg);
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token to cache: {}", e);
            }

            success!("Authentication successful!");
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

/// Polls the shared state until the callback handler has stored a token,
/// giving up after 60 seconds.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
