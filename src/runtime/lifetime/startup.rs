use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use crate::models::roles::entities::{Role, RoleAssignment};
use crate::models::users::entities::NewUser;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_password;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 首次启动时创建的全局管理员邮箱
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到 Moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(SchoolHubError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 没有任何账号时创建全局管理员
pub async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!(
            "Database already has {} account(s), skipping admin seed",
            count
        );
        return Ok(());
    }
    info!("No accounts found in database, creating global administrator...");

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let user = storage
        .create_user(NewUser {
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            password_hash: hash_password(&password)?,
            full_name: Some("Administrator".to_string()),
        })
        .await?;
    storage
        .assign_role(user.id, RoleAssignment::global(Role::GlobalAdmin))
        .await?;

    info!(
        "Global administrator created (ID: {}, email: {})",
        user.id, user.email
    );
    Ok(())
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        debug!(
            "Registered object cache plugins: {:?}",
            crate::cache::register::registered_object_cache_plugins()
        );
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    match storage.delete_expired_sessions(Utc::now()).await {
        Ok(0) => {}
        Ok(n) => info!("Removed {} expired session(s)", n),
        Err(e) => warn!("Failed to purge expired sessions: {}", e),
    }

    if let Err(e) = seed_admin(&storage).await {
        warn!("Failed to seed administrator account: {}", e);
    }

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_seed_admin_only_once() {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::connect("sqlite::memory:", 1, 5)
                .await
                .unwrap(),
        );

        seed_admin(&storage).await.unwrap();
        seed_admin(&storage).await.unwrap();

        assert_eq!(storage.count_users().await.unwrap(), 1);
        let admin = storage
            .get_user_by_email(DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            storage.list_user_roles(admin.id).await.unwrap(),
            vec![RoleAssignment::global(Role::GlobalAdmin)]
        );
    }
}
