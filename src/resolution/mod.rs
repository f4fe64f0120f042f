pub mod cache;
pub mod resolver;

pub use cache::{LruResolutionCache, ResolutionCache};
pub use resolver::{resolve_cached, NameResolver, PassthroughResolver, TableResolver};
