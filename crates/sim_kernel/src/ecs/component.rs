//! Component trait

/// Marker trait for components
///
/// Components are plain data owned by exactly one entity. The `Send + Sync`
/// bound keeps the [`World`](super::World) shareable across threads.
pub trait Component: 'static + Send + Sync {}
