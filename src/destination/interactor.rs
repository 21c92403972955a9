use crate::error::NavigationError;
use crate::routing::Routing;
use ahash::AHashMap;
use async_trait::async_trait;
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A closure-style interactor that answers a request on the calling thread.
pub trait RequestHandler<Req, Out>: Send {
    fn handle(&mut self, request: Req) -> Result<Out, NavigationError>;
}

impl<Req, Out, F> RequestHandler<Req, Out> for F
where
    F: FnMut(Req) -> Result<Out, NavigationError> + Send,
{
    fn handle(&mut self, request: Req) -> Result<Out, NavigationError> {
        self(request)
    }
}

/// An interactor whose work is awaited. Calls are serialized through a mutex,
/// so an implementation can keep mutable state without its own locking.
#[async_trait]
pub trait AsyncRequestHandler<Req: Send + 'static, Out: Send + 'static>: Send {
    async fn handle(&mut self, request: Req) -> Result<Out, NavigationError>;
}

type BlockingHandler<Req, Out> = Box<dyn RequestHandler<Req, Out>>;
type AwaitedHandler<Req, Out> = Arc<Mutex<Box<dyn AsyncRequestHandler<Req, Out>>>>;

/// An interactor ready for registration, with its concurrency strategy chosen.
pub enum Interactor<Req: Send + 'static, Out: Send + 'static> {
    Blocking(BlockingHandler<Req, Out>),
    Awaited(AwaitedHandler<Req, Out>),
}

impl<Req: Send + 'static, Out: Send + 'static> Interactor<Req, Out> {
    pub fn blocking<H>(handler: H) -> Self
    where
        H: RequestHandler<Req, Out> + 'static,
    {
        Interactor::Blocking(Box::new(handler))
    }

    pub fn awaited<H>(handler: H) -> Self
    where
        H: AsyncRequestHandler<Req, Out> + 'static,
    {
        Interactor::Awaited(Arc::new(Mutex::new(Box::new(handler))))
    }
}

// The request and result types are erased at registration and recovered by
// downcasting, so a lookup with the wrong types behaves like a missing entry.
enum InteractorSlot {
    Blocking(Box<dyn Any + Send>),
    Awaited(Box<dyn Any + Send + Sync>),
}

impl InteractorSlot {
    fn strategy(&self) -> &'static str {
        match self {
            InteractorSlot::Blocking(_) => "blocking",
            InteractorSlot::Awaited(_) => "awaited",
        }
    }
}

/// A cloned handle onto an awaited interactor. Holding it does not borrow the destination.
pub struct AsyncInteractorHandle<Req: Send + 'static, Out: Send + 'static> {
    handler: AwaitedHandler<Req, Out>,
}

impl<Req: Send + 'static, Out: Send + 'static> AsyncInteractorHandle<Req, Out> {
    pub async fn perform(&self, request: Req) -> Result<Out, NavigationError> {
        let mut handler = self.handler.lock().await;
        handler.handle(request).await
    }
}

impl<Req: Send + 'static, Out: Send + 'static> Clone for AsyncInteractorHandle<Req, Out> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

/// The interactors registered on one destination, keyed by interactor tag.
pub struct InteractorRegistry<R: Routing> {
    slots: AHashMap<R::InteractorType, InteractorSlot>,
    _routing: PhantomData<R>,
}

impl<R: Routing> Default for InteractorRegistry<R> {
    fn default() -> Self {
        Self {
            slots: AHashMap::new(),
            _routing: PhantomData,
        }
    }
}

impl<R: Routing> InteractorRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, tag: &R::InteractorType) -> bool {
        self.slots.contains_key(tag)
    }

    /// Registers an interactor, returning `true` if it replaced an earlier one.
    pub fn register<Req, Out>(&mut self, tag: R::InteractorType, interactor: Interactor<Req, Out>) -> bool
    where
        Req: Send + 'static,
        Out: Send + 'static,
    {
        let slot = match interactor {
            Interactor::Blocking(handler) => InteractorSlot::Blocking(Box::new(handler)),
            Interactor::Awaited(handler) => InteractorSlot::Awaited(Box::new(handler)),
        };
        self.slots.insert(tag, slot).is_some()
    }

    pub fn remove(&mut self, tag: &R::InteractorType) -> bool {
        self.slots.remove(tag).is_some()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Runs a blocking interactor and hands its result to `completion`.
    pub fn perform_blocking<Req, Out, C>(
        &mut self,
        tag: &R::InteractorType,
        request: Req,
        completion: C,
    ) -> Result<(), NavigationError>
    where
        Req: Send + 'static,
        Out: Send + 'static,
        C: FnOnce(Result<Out, NavigationError>),
    {
        let slot = self
            .slots
            .get_mut(tag)
            .ok_or_else(|| NavigationError::InteractorNotFound(format!("{:?}", tag)))?;
        let handler = match slot {
            InteractorSlot::Blocking(handler) => handler
                .downcast_mut::<BlockingHandler<Req, Out>>()
                .ok_or_else(|| NavigationError::InteractorNotFound(format!("{:?}", tag)))?,
            other => {
                return Err(NavigationError::UnsupportedInteractorActionType {
                    interactor: format!("{:?} ({})", tag, other.strategy()),
                    requested: "blocking",
                });
            }
        };
        completion(handler.handle(request));
        Ok(())
    }

    /// Looks up an awaited interactor and clones a handle onto it.
    pub fn awaited_handle<Req, Out>(
        &self,
        tag: &R::InteractorType,
    ) -> Result<AsyncInteractorHandle<Req, Out>, NavigationError>
    where
        Req: Send + 'static,
        Out: Send + 'static,
    {
        let slot = self
            .slots
            .get(tag)
            .ok_or_else(|| NavigationError::InteractorNotFound(format!("{:?}", tag)))?;
        match slot {
            InteractorSlot::Awaited(handler) => handler
                .downcast_ref::<AwaitedHandler<Req, Out>>()
                .map(|handler| AsyncInteractorHandle {
                    handler: Arc::clone(handler),
                })
                .ok_or_else(|| NavigationError::InteractorNotFound(format!("{:?}", tag))),
            other => Err(NavigationError::UnsupportedInteractorActionType {
                interactor: format!("{:?} ({})", tag, other.strategy()),
                requested: "awaited",
            }),
        }
    }
}
