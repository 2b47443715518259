use crate::{AppConfig, JwtConfig, LogFormat, ScopeMode};
use figment::Jail;
use secrecy::{ExposeSecret, Secret};

#[test]
fn test_secret_redaction() {
    let secret = Secret::new("my_secret_password".to_string());
    let debug_output = format!("{:?}", secret);
    assert!(debug_output.contains("Secret([REDACTED"));
    assert!(!debug_output.contains("my_secret_password"));
}

#[test]
fn test_jwt_config_redaction() {
    let config = JwtConfig {
        secret: Secret::new("super-secret-signing-key".to_string()),
        issuer: "freight-identity".to_string(),
        audience: "freight-portal".to_string(),
        expires_in: 3600,
    };
    let debug_output = format!("{:?}", config);
    assert!(!debug_output.contains("super-secret-signing-key"));
    assert!(debug_output.contains("Secret([REDACTED"));
}

#[test]
fn test_defaults_without_files() {
    Jail::expect_with(|_jail| {
        let config = AppConfig::load(".").map_err(|e| e.to_string())?;

        assert_eq!(config.app_name, "freight");
        assert!(config.is_development());
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Text);
        assert_eq!(config.policy.scope_mode, ScopeMode::Lenient);
        assert!(config.policy.table_path.is_none());
        assert!(config.jwt.is_none());
        Ok(())
    });
}

#[test]
fn test_environment_file_overrides_default() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "default.toml",
            r#"
                app_name = "freight-portal"

                [telemetry]
                log_level = "debug"

                [policy]
                table_path = "policies/default.toml"
            "#,
        )?;
        jail.create_file(
            "production.toml",
            r#"
                app_env = "production"

                [telemetry]
                format = "json"

                [policy]
                scope_mode = "strict"

                [jwt]
                secret = "prod-signing-key"
            "#,
        )?;
        jail.set_env("APP_ENV", "production");

        let config = AppConfig::load(".").map_err(|e| e.to_string())?;

        assert_eq!(config.app_name, "freight-portal");
        assert!(config.is_production());
        assert_eq!(config.telemetry.log_level, "debug");
        assert_eq!(config.telemetry.format, LogFormat::Json);
        assert_eq!(config.policy.scope_mode, ScopeMode::Strict);
        assert_eq!(config.policy.table_path.as_deref(), Some("policies/default.toml"));

        let jwt = config.jwt.expect("jwt section");
        assert_eq!(jwt.secret.expose_secret(), "prod-signing-key");
        assert_eq!(jwt.expires_in, 3600);
        assert_eq!(jwt.issuer, "freight-identity");
        Ok(())
    });
}

#[test]
fn test_env_vars_override_files() {
    Jail::expect_with(|jail| {
        jail.create_file("default.toml", "[policy]\nscope_mode = \"lenient\"\n")?;
        jail.set_env("FREIGHT_POLICY__SCOPE_MODE", "strict");
        jail.set_env("FREIGHT_TELEMETRY__LOG_LEVEL", "trace");

        let config = AppConfig::load(".").map_err(|e| e.to_string())?;

        assert_eq!(config.policy.scope_mode, ScopeMode::Strict);
        assert_eq!(config.telemetry.log_level, "trace");
        Ok(())
    });
}

#[test]
fn test_invalid_scope_mode_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("default.toml", "[policy]\nscope_mode = \"permissive\"\n")?;

        assert!(AppConfig::load(".").is_err());
        Ok(())
    });
}
