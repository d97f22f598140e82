use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 常用环境变量到配置键的映射，优先级高于 `SCHOOLHUB_*`
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
    ("CACHE_TTL", "cache.default_ttl"),
    ("SESSION_TTL_HOURS", "session.ttl_hours"),
    ("INVITATION_TTL_DAYS", "invitation.ttl_days"),
];

/// 签到码最短长度，过短时碰撞概率过高
const MIN_CODE_LENGTH: usize = 4;
/// 会话令牌最短长度
const MIN_TOKEN_LENGTH: usize = 32;

impl AppConfig {
    /// 加载配置：`config.toml` -> `config.{APP_ENV}.toml` -> `SCHOOLHUB_*` -> 常用环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{env}")).required(false))
            .add_source(
                Environment::with_prefix("SCHOOLHUB")
                    .separator("_")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        Self::from_builder(builder)
    }

    /// 构建、反序列化并校验
    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers.max(1));
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// 校验取值之间的约束
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Message(msg));

        if self.session.ttl_hours <= 0 {
            return invalid(format!(
                "session.ttl_hours must be positive, got {}",
                self.session.ttl_hours
            ));
        }
        if self.session.token_length < MIN_TOKEN_LENGTH {
            return invalid(format!(
                "session.token_length must be at least {MIN_TOKEN_LENGTH}, got {}",
                self.session.token_length
            ));
        }

        let attendance = &self.attendance;
        if attendance.code_length < MIN_CODE_LENGTH {
            return invalid(format!(
                "attendance.code_length must be at least {MIN_CODE_LENGTH}, got {}",
                attendance.code_length
            ));
        }
        if attendance.max_duration_minutes < 1 {
            return invalid("attendance.max_duration_minutes must be positive".into());
        }
        if !(1..=attendance.max_duration_minutes).contains(&attendance.default_duration_minutes) {
            return invalid(format!(
                "attendance.default_duration_minutes must be within 1..={}, got {}",
                attendance.max_duration_minutes, attendance.default_duration_minutes
            ));
        }

        if self.invitation.ttl_days <= 0 {
            return invalid(format!(
                "invitation.ttl_days must be positive, got {}",
                self.invitation.ttl_days
            ));
        }

        if !matches!(self.cache.cache_type.as_str(), "moka" | "redis") {
            return invalid(format!(
                "cache.type must be \"moka\" or \"redis\", got \"{}\"",
                self.cache.cache_type
            ));
        }

        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 登录会话有效期
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session.ttl_hours)
    }

    /// 会话缓存时长（秒），不超过会话剩余有效期
    pub fn session_cache_ttl(&self, remaining_secs: u64) -> u64 {
        self.cache.default_ttl.min(remaining_secs)
    }

    /// 签到会话时长；未指定时取默认值，超出 `1..=max` 返回 `None`
    pub fn attendance_duration(&self, requested: Option<i64>) -> Option<chrono::Duration> {
        let minutes = requested.unwrap_or(self.attendance.default_duration_minutes);
        (1..=self.attendance.max_duration_minutes)
            .contains(&minutes)
            .then(|| chrono::Duration::minutes(minutes))
    }

    /// 邀请有效期
    pub fn invitation_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.invitation.ttl_days)
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const DEFAULTS: &str = include_str!("../../config.toml");

    fn with_overrides(overrides: &[(&str, i64)]) -> Result<AppConfig, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULTS, FileFormat::Toml));
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        AppConfig::from_builder(builder)
    }

    #[test]
    fn test_default_file_is_valid() {
        let config = with_overrides(&[]).unwrap();
        assert!(config.server.workers >= 1);
        assert_eq!(config.session_ttl(), chrono::Duration::hours(24));
        assert_eq!(config.invitation_ttl(), chrono::Duration::days(7));
    }

    #[test]
    fn test_rejects_inconsistent_values() {
        for overrides in [
            [("session.ttl_hours", 0)],
            [("session.token_length", 8)],
            [("attendance.code_length", 0)],
            [("attendance.default_duration_minutes", 5000)],
            [("attendance.max_duration_minutes", 0)],
            [("invitation.ttl_days", -1)],
        ] {
            let err = with_overrides(&overrides).unwrap_err().to_string();
            assert!(err.contains(overrides[0].0), "{err}");
        }
    }

    #[test]
    fn test_attendance_duration_bounds() {
        let config = with_overrides(&[]).unwrap();
        assert_eq!(
            config.attendance_duration(None),
            Some(chrono::Duration::minutes(30))
        );
        assert_eq!(
            config.attendance_duration(Some(1440)),
            Some(chrono::Duration::minutes(1440))
        );
        assert_eq!(config.attendance_duration(Some(0)), None);
        assert_eq!(config.attendance_duration(Some(1441)), None);
    }

    #[test]
    fn test_session_cache_ttl_never_outlives_session() {
        let config = with_overrides(&[("cache.default_ttl", 300)]).unwrap();
        assert_eq!(config.session_cache_ttl(60), 60);
        assert_eq!(config.session_cache_ttl(3600), 300);
    }
}
