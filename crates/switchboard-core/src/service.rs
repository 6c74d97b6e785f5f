//! The single-method service capability.
//!
//! A [`Service`] is what generated or hand-written shims bind to HTTP. It
//! takes a cancellation-aware [`ServiceContext`] and a typed input and
//! produces a typed output or a [`ServiceError`].

use crate::{ServiceContext, ServiceError};
use std::future::Future;
use std::marker::PhantomData;

/// A single-method service taking `I` and returning `O`.
///
/// # Example
///
/// ```rust
/// use switchboard_core::{Service, ServiceContext, ServiceError};
///
/// struct Upper;
///
/// impl Service<String, String> for Upper {
///     async fn call(&self, _ctx: &ServiceContext, input: String) -> Result<String, ServiceError> {
///         Ok(input.to_uppercase())
///     }
/// }
/// ```
pub trait Service<I, O>: Send + Sync + 'static
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Invokes the service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the service fails. The shims never retry.
    fn call(
        &self,
        ctx: &ServiceContext,
        input: I,
    ) -> impl Future<Output = Result<O, ServiceError>> + Send;
}

/// A closure-backed [`Service`].
///
/// The closure receives an owned clone of the context so the returned future
/// does not borrow from the caller.
///
/// ```rust
/// use switchboard_core::{FnService, Service, ServiceContext, ServiceError};
///
/// let echo = FnService::new(|_ctx: ServiceContext, input: String| async move {
///     Ok::<_, ServiceError>(input)
/// });
/// # let _ = echo;
/// ```
pub struct FnService<F, I, O, Fut>
where
    F: Fn(ServiceContext, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, ServiceError>> + Send,
{
    func: F,
    _phantom: PhantomData<fn(I) -> (O, Fut)>,
}

impl<F, I, O, Fut> FnService<F, I, O, Fut>
where
    F: Fn(ServiceContext, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, ServiceError>> + Send,
{
    /// Wraps a closure as a service.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, I, O, Fut> Service<I, O> for FnService<F, I, O, Fut>
where
    F: Fn(ServiceContext, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, ServiceError>> + Send + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    async fn call(&self, ctx: &ServiceContext, input: I) -> Result<O, ServiceError> {
        (self.func)(ctx.clone(), input).await
    }
}

impl<I, O, S> Service<I, O> for std::sync::Arc<S>
where
    S: Service<I, O>,
    I: Send + 'static,
    O: Send + 'static,
{
    fn call(
        &self,
        ctx: &ServiceContext,
        input: I,
    ) -> impl Future<Output = Result<O, ServiceError>> + Send {
        S::call(self, ctx, input)
    }
}
