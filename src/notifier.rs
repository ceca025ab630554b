// 📣 Notifier - Synchronous publish/subscribe
//
// Listeners are shared handles (Rc) compared by address, so the same
// handle a caller subscribed with is the one it unsubscribes with.
// Delivery happens inline, in subscription order, before publish returns.

use std::rc::Rc;

// ============================================================================
// LISTENER
// ============================================================================

/// Something that reacts to published messages
pub trait Listener<M> {
    fn update(&self, message: &M);
}

impl<M, F> Listener<M> for F
where
    F: Fn(&M),
{
    fn update(&self, message: &M) {
        self(message)
    }
}

pub type SharedListener<M> = Rc<dyn Listener<M>>;

fn address<L: ?Sized>(listener: &Rc<L>) -> *const () {
    Rc::as_ptr(listener) as *const ()
}

// ============================================================================
// OBSERVABLE CAPABILITY
// ============================================================================

/// Subject side of the observer pattern
pub trait Observable<M> {
    /// Register a listener. Subscribing the same handle twice is a no-op.
    fn subscribe(&mut self, listener: SharedListener<M>);

    /// Remove a listener. Returns false (and changes nothing) if it was not subscribed.
    fn unsubscribe<L: ?Sized>(&mut self, listener: &Rc<L>) -> bool;

    /// Deliver a message to every current listener, in subscription order
    fn publish(&self, message: &M);
}

// ============================================================================
// NOTIFIER
// ============================================================================

pub struct Notifier<M> {
    listeners: Vec<SharedListener<M>>,
}

impl<M> Notifier<M> {
    pub fn new() -> Self {
        Notifier {
            listeners: Vec::new(),
        }
    }

    /// Number of subscribed listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn is_subscribed<L: ?Sized>(&self, listener: &Rc<L>) -> bool {
        let target = address(listener);
        self.listeners.iter().any(|l| address(l) == target)
    }
}

impl<M> Observable<M> for Notifier<M> {
    fn subscribe(&mut self, listener: SharedListener<M>) {
        if self.is_subscribed(&listener) {
            tracing::trace!("listener already subscribed");
            return;
        }
        self.listeners.push(listener);
    }

    fn unsubscribe<L: ?Sized>(&mut self, listener: &Rc<L>) -> bool {
        let target = address(listener);
        let before = self.listeners.len();
        self.listeners.retain(|l| address(l) != target);
        before != self.listeners.len()
    }

    fn publish(&self, message: &M) {
        if self.listeners.is_empty() {
            tracing::trace!("no listeners, message dropped");
            return;
        }

        for listener in &self.listeners {
            listener.update(message);
        }
    }
}

impl<M> Default for Notifier<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> std::fmt::Debug for Notifier<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
