//! 缓存层
//!
//! 通过插件注册表选择 Moka（进程内）或 Redis 实现。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明缓存插件：在进程启动时把构造函数写入注册表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[::ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                ::std::sync::Arc::new(|| {
                    ::std::boxed::Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::SchoolHubError::cache_connection)?;
                        Ok(::std::boxed::Box::new(cache)
                            as ::std::boxed::Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
