//! Cookie-session settings read from the environment.
//!
//! Debug builds fall back to permissive defaults with a warning; release
//! builds require every toggle to be present and valid, and refuse to start
//! without a readable signing key of at least [`SESSION_KEY_MIN_LEN`] bytes.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

/// Minimum signing key length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";

/// Build mode for session validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Lenient: defaults with warnings.
    Debug,
    /// Strict: explicit toggles and a real key.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated cookie-session settings.
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Whether cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// `SameSite` policy; strict in release builds.
    pub same_site: SameSite,
}

/// Invalid or missing session configuration.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read session settings through `env`.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = flag(env, mode, COOKIE_SECURE_ENV, true)?;
    let allow_ephemeral = flag(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = signing_key(env, mode, allow_ephemeral)?;
    let same_site = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn flag<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    debug_default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return match mode {
            BuildMode::Debug => {
                warn!(variable = name, default = debug_default, "session toggle not set");
                Ok(debug_default)
            }
            BuildMode::Release => Err(SessionConfigError::MissingEnv { name }),
        };
    };
    match (parse_bool(&value), mode) {
        (Some(parsed), _) => Ok(parsed),
        (None, BuildMode::Debug) => {
            warn!(variable = name, %value, default = debug_default, "invalid session toggle");
            Ok(debug_default)
        }
        (None, BuildMode::Release) => Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn signing_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    fn key_file(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp key file");
        file.write_all(&vec![b'k'; len]).expect("write key");
        file
    }

    fn env_with(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |name| vars.get(name).cloned());
        env
    }

    fn path_of(file: &NamedTempFile) -> &str {
        file.path().to_str().expect("utf8 temp path")
    }

    #[rstest]
    fn release_accepts_complete_configuration() {
        let key = key_file(SESSION_KEY_MIN_LEN);
        let env = env_with(&[
            (KEY_FILE_ENV, path_of(&key)),
            (COOKIE_SECURE_ENV, "1"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ]);

        let settings =
            session_settings_from_env(&env, BuildMode::Release).expect("valid settings");

        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    fn release_requires_cookie_toggle() {
        let env = env_with(&[(ALLOW_EPHEMERAL_ENV, "0")]);

        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("missing toggle");

        assert!(matches!(
            err,
            SessionConfigError::MissingEnv {
                name: COOKIE_SECURE_ENV
            }
        ));
    }

    #[rstest]
    #[case("maybe")]
    #[case("")]
    fn release_rejects_unparseable_toggle(#[case] value: &str) {
        let env = env_with(&[(COOKIE_SECURE_ENV, value), (ALLOW_EPHEMERAL_ENV, "0")]);

        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("invalid toggle");

        assert!(matches!(err, SessionConfigError::InvalidEnv { .. }));
    }

    #[rstest]
    fn release_rejects_ephemeral_keys() {
        let env = env_with(&[(COOKIE_SECURE_ENV, "1"), (ALLOW_EPHEMERAL_ENV, "yes")]);

        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("ephemeral refused");

        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn release_rejects_short_key() {
        let key = key_file(16);
        let env = env_with(&[
            (KEY_FILE_ENV, path_of(&key)),
            (COOKIE_SECURE_ENV, "1"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ]);

        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("short key");

        assert!(matches!(err, SessionConfigError::KeyTooShort { length: 16, .. }));
    }

    #[rstest]
    fn release_reports_unreadable_key() {
        let env = env_with(&[
            (KEY_FILE_ENV, "/nonexistent/session_key"),
            (COOKIE_SECURE_ENV, "1"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ]);

        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("unreadable key");

        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    fn debug_defaults_to_secure_lax_with_generated_key() {
        let env = env_with(&[(KEY_FILE_ENV, "/nonexistent/session_key")]);

        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");

        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn debug_honours_insecure_cookie_toggle() {
        let env = env_with(&[
            (KEY_FILE_ENV, "/nonexistent/session_key"),
            (COOKIE_SECURE_ENV, "false"),
        ]);

        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug settings");

        assert!(!settings.cookie_secure);
    }
}
