// ABOUTME: Credential discovery with precedence chain
// ABOUTME: CLI flag → environment variable → .env file in the working directory

use crate::{Error, Result};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Everything a sync run needs to talk to the API.
pub struct Credentials {
    pub token: String,
    pub root_page_id: String,
}

pub fn resolve_credentials(
    cli_token: Option<String>,
    cli_root_page: Option<String>,
) -> Result<Credentials> {
    let env_file = load_env_file(Path::new(".env"))?;

    let token = resolve_value(cli_token, "NOTION_TOKEN", &env_file).ok_or_else(|| {
        Error::Auth(
            "No API token found. Provide via --token, NOTION_TOKEN env var, or .env file".into(),
        )
    })?;

    let root_page_id = resolve_value(cli_root_page, "NOTION_ROOT_PAGE_ID", &env_file)
        .ok_or_else(|| {
            Error::Auth(
                "No root page id found. Provide via --root-page, NOTION_ROOT_PAGE_ID env var, or .env file"
                    .into(),
            )
        })?;

    Ok(Credentials {
        token,
        root_page_id,
    })
}

fn resolve_value(
    cli: Option<String>,
    key: &str,
    env_file: &HashMap<String, String>,
) -> Option<String> {
    cli.or_else(|| env::var(key).ok())
        .or_else(|| env_file.get(key).cloned())
}

/// Parse a minimal `.env` file: `KEY=VALUE` lines, `#` comments and
/// blanks skipped, single or double quotes around values stripped.
/// A missing file is not an error.
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();

    if !path.exists() {
        return Ok(values);
    }

    let content = fs::read_to_string(path)?;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            values.insert(key.trim().to_string(), value.to_string());
        }
    }

    Ok(values)
}
