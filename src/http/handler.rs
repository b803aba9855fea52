//! Request handlers and their composition surface.

use std::sync::Arc;

use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// Produces a response for a request by writing into a [`ResponseWriter`].
///
/// Decorators wrap another handler and hand it a writer of their own, so a
/// chain of handlers composes by ordinary value nesting.
pub trait Handler: Send + Sync {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) -> anyhow::Result<()>;
}

/// Shared, type-erased handler chain.
pub type SharedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) -> anyhow::Result<()> {
        (**self).serve(w, req)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) -> anyhow::Result<()> {
        (**self).serve(w, req)
    }
}

/// Handler backed by a closure. See [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wraps a closure as a [`Handler`].
///
/// ```
/// # use revalidate::http::handler::handler_fn;
/// let hello = handler_fn(|w, _req| {
///     w.write_all(b"hello")?;
///     Ok(())
/// });
/// # let _ = hello;
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request) -> anyhow::Result<()> + Send + Sync,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request) -> anyhow::Result<()> + Send + Sync,
{
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) -> anyhow::Result<()> {
        (self.f)(w, req)
    }
}
