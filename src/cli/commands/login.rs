use anyhow::Result;

use super::print_json;
use crate::config::AppState;

pub async fn login(state: &AppState, username: &str, password: &str) -> Result<()> {
    let outcome = state.session.login(username, password).await?;
    print_json(&outcome)
}
