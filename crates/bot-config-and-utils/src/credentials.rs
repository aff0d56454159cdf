//! Account credentials for the platform API.

use crate::{CoreError, CoreResult, Paths};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use tracing::{debug, info};

const KEYS: [&str; 5] = [
    "username",
    "password",
    "client_id",
    "client_secret",
    "user_agent",
];

/// Keys read without echo when prompting.
const HIDDEN_KEYS: [&str; 2] = ["password", "client_secret"];

/// Script-app credentials used for the password grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Credentials {
    /// Load credentials from `cred.txt` when present, otherwise from the
    /// `MIKASA_*` environment variables. Keys still missing are asked for on
    /// the terminal when stdin is interactive.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let file = paths.credentials_file();
        if file.exists() {
            debug!(path = %file.display(), "Loading credentials from file");
            return Self::load_from_file(&file);
        }

        debug!("No credentials file, reading environment");
        match Self::from_env() {
            Err(CoreError::MissingCredentials(missing)) if io::stdin().is_terminal() => {
                info!(missing = ?missing, "Prompting for credentials");
                println!("No cred.txt file was found. Enter your credentials here:");
                Self::prompt(
                    env_lookup,
                    &mut io::stdin().lock(),
                    &mut io::stdout(),
                    |label| rpassword::prompt_password(label),
                )
            }
            other => other,
        }
    }

    /// Fill the keys `lookup` cannot answer by asking on `output` and reading
    /// `input`. Hidden keys go through `read_hidden` instead. A blank answer
    /// leaves the key missing.
    pub fn prompt<R, W>(
        lookup: impl Fn(&str) -> Option<String>,
        input: &mut R,
        output: &mut W,
        read_hidden: impl Fn(&str) -> io::Result<String>,
    ) -> CoreResult<Self>
    where
        R: BufRead,
        W: Write,
    {
        let mut values = HashMap::new();

        for key in KEYS {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                values.insert(key, value);
                continue;
            }

            let label = format!("{}: ", key.replace('_', " "));
            let answer = if HIDDEN_KEYS.contains(&key) {
                read_hidden(&label)?
            } else {
                write!(output, "{label}")?;
                output.flush()?;
                let mut line = String::new();
                input.read_line(&mut line)?;
                line
            };
            values.insert(key, answer.trim().to_string());
        }

        Self::from_map(|key| values.get(key).cloned())
    }

    /// Parse a `key = value` file. Blank lines and `#` comments are skipped.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse `key = value` lines.
    pub fn parse(content: &str) -> CoreResult<Self> {
        let mut values = HashMap::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                CoreError::Config(format!(
                    "credentials line {} is not a key = value pair",
                    index + 1
                ))
            })?;
            values.insert(key.trim().to_string(), value.trim().to_string());
        }

        Self::from_map(|key| values.get(key).cloned())
    }

    /// Read `MIKASA_USERNAME`, `MIKASA_PASSWORD`, `MIKASA_CLIENT_ID`,
    /// `MIKASA_CLIENT_SECRET` and `MIKASA_USER_AGENT`.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_map(env_lookup)
    }

    fn from_map(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let mut found: HashMap<&'static str, String> = HashMap::new();
        let mut missing = Vec::new();

        for key in KEYS {
            match lookup(key).filter(|v| !v.is_empty()) {
                Some(value) => {
                    found.insert(key, value);
                }
                None => missing.push(key),
            }
        }

        if !missing.is_empty() {
            return Err(CoreError::MissingCredentials(missing));
        }

        let mut take = |key: &str| found.remove(key).unwrap_or_default();
        Ok(Self {
            username: take("username"),
            password: take("password"),
            client_id: take("client_id"),
            client_secret: take("client_secret"),
            user_agent: take("user_agent"),
        })
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(format!("MIKASA_{}", key.to_uppercase())).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
# script app
username = mikasa_bot
password=hunter2
client_id = abc123
client_secret = s3cr3t

user_agent = script:mikasa:v0.1 (by /u/mikasa_bot)
";

    #[test]
    fn test_parse_credentials() {
        let creds = Credentials::parse(SAMPLE).unwrap();
        assert_eq!(creds.username, "mikasa_bot");
        assert_eq!(creds.password, "hunter2");
        assert_eq!(creds.client_id, "abc123");
        assert_eq!(creds.client_secret, "s3cr3t");
        assert_eq!(creds.user_agent, "script:mikasa:v0.1 (by /u/mikasa_bot)");
    }

    #[test]
    fn test_parse_reports_missing_keys() {
        let err = Credentials::parse("username = a\npassword = b\n").unwrap_err();
        match err {
            CoreError::MissingCredentials(keys) => {
                assert_eq!(keys, vec!["client_id", "client_secret", "user_agent"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        let err = Credentials::parse("username mikasa_bot\n").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::parse(SAMPLE).unwrap();
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("mikasa_bot"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn test_load_prefers_file() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        std::fs::write(paths.credentials_file(), SAMPLE).unwrap();

        let creds = Credentials::load(&paths).unwrap();
        assert_eq!(creds.client_id, "abc123");
    }

    #[test]
    fn test_prompt_asks_only_for_missing_keys() {
        let mut input = io::Cursor::new("mikasa_bot\nabc123\n");
        let mut output = Vec::new();
        let known = |key: &str| (key == "user_agent").then(|| "script:mikasa".to_string());

        let creds = Credentials::prompt(known, &mut input, &mut output, |label| {
            Ok(match label {
                "password: " => "hunter2\n".to_string(),
                _ => "s3cr3t".to_string(),
            })
        })
        .unwrap();

        assert_eq!(creds.username, "mikasa_bot");
        assert_eq!(creds.password, "hunter2");
        assert_eq!(creds.client_id, "abc123");
        assert_eq!(creds.client_secret, "s3cr3t");
        assert_eq!(creds.user_agent, "script:mikasa");

        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown, "username: client id: ");
    }

    #[test]
    fn test_prompt_blank_answer_is_missing() {
        let mut input = io::Cursor::new("\n\n\n");
        let mut output = Vec::new();

        let err = Credentials::prompt(|_| None, &mut input, &mut output, |_| Ok(String::new()))
            .unwrap_err();

        match err {
            CoreError::MissingCredentials(keys) => assert_eq!(keys, KEYS.to_vec()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
