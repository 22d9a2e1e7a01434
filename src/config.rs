use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which behavior set the server runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    /// Anything other than `development` is treated as production.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("development") {
            AppEnv::Development
        } else {
            AppEnv::Production
        }
    }

    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
        }
    }
}

/// Runtime settings. Field names match the environment variables
/// (`APP_ENV`, `DB_PATH`, `PORT`, `LOGLEVEL`, `TEMPLATES_DIR`, `STATIC_DIR`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app_env: String,
    pub db_path: String,
    pub port: u16,
    pub loglevel: String,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_env: "development".to_string(),
            db_path: "agroconsultoria.db".to_string(),
            port: 8080,
            loglevel: "info".to_string(),
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("assets/static"),
        }
    }
}

impl Config {
    /// Hardcoded defaults, overridden by whatever is set in the process environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(&[
            "APP_ENV",
            "DB_PATH",
            "PORT",
            "LOGLEVEL",
            "TEMPLATES_DIR",
            "STATIC_DIR",
        ]))
    }

    pub fn environment(&self) -> AppEnv {
        AppEnv::parse(&self.app_env)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_development_token_selects_development() {
        assert_eq!(AppEnv::parse("development"), AppEnv::Development);
        assert_eq!(AppEnv::parse(" Development "), AppEnv::Development);
        assert_eq!(AppEnv::parse("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Production);
        assert_eq!(AppEnv::parse(""), AppEnv::Production);
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .extract()
            .expect("defaults extract");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.db_path, "agroconsultoria.db");
        assert_eq!(cfg.environment(), AppEnv::Development);
        assert_eq!(cfg.listen_addr(), "0.0.0.0:8080");
    }
}
