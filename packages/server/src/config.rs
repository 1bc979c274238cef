use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::sandbox::RuntimeSpec;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Settings for the external execution sandbox.
#[derive(Debug, Deserialize, Clone)]
pub struct SandboxConfig {
    /// Full URL of the sandbox execute endpoint.
    pub url: String,
    /// HTTP request timeout in seconds. Must comfortably exceed the largest
    /// problem time limit, since the sandbox enforces the real budget.
    #[serde(default = "default_sandbox_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Language identifier -> sandbox runtime mapping. The defaults cover the
    /// languages the platform advertises; deployments can override per entry.
    #[serde(default = "default_languages")]
    pub languages: HashMap<String, RuntimeSpec>,
}

fn default_sandbox_timeout_secs() -> u64 {
    60
}

fn default_languages() -> HashMap<String, RuntimeSpec> {
    [
        ("c", "gcc", "10.2.0"),
        ("cpp", "g++", "10.2.0"),
        ("go", "go", "1.16.2"),
        ("java", "java", "15.0.2"),
        ("javascript", "node", "18.15.0"),
        ("python", "python", "3.10.0"),
        ("rust", "rust", "1.68.2"),
        ("typescript", "typescript", "5.0.3"),
    ]
    .into_iter()
    .map(|(lang, runtime, version)| {
        (
            lang.to_string(),
            RuntimeSpec {
                runtime: runtime.to_string(),
                version: version.to_string(),
            },
        )
    })
    .collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct JudgeConfig {
    /// Maximum size of submitted source code in bytes.
    pub max_code_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub sandbox: SandboxConfig,
    pub judge: JudgeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("JUDGE_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", vec!["*"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "postgres://localhost/judge")?
            .set_default("auth.jwt_secret", "")?
            .set_default("sandbox.url", "http://localhost:2000/api/v2/execute")?
            .set_default("judge.max_code_size", 1_048_576)?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g. JUDGE__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("JUDGE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_language_table_covers_advertised_languages() {
        let languages = default_languages();
        for lang in ["c", "cpp", "java", "javascript", "python", "rust"] {
            assert!(languages.contains_key(lang), "missing {lang}");
        }
        assert_eq!(languages["python"].runtime, "python");
    }
}
