use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Pending notifications kept per listener before older ones are dropped.
const NOTIFICATION_CAPACITY: usize = 16;

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// "The active locale changed." Carries no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleChanged;

/// Host-side source of locale-change notifications.
///
/// Clones share the same channel, so the host can keep one and hand another
/// to the service.
#[derive(Debug, Clone)]
pub struct LocaleNotifier {
    sender: broadcast::Sender<LocaleChanged>,
}

impl LocaleNotifier {
    /// Create a notifier with no listeners.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self { sender }
    }

    /// Signal a locale change. Returns how many listeners were reached.
    pub fn notify(&self) -> usize {
        self.sender.send(LocaleChanged).unwrap_or(0)
    }

    fn listen(&self) -> broadcast::Receiver<LocaleChanged> {
        self.sender.subscribe()
    }
}

impl Default for LocaleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies one registration of a bridge's listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

enum Registration {
    Unregistered,
    Registered {
        id: SubscriptionId,
        task: JoinHandle<()>,
    },
}

/// Forwards locale-change notifications to a single callback.
///
/// One listener task per bridge. Each callback runs to completion before the
/// next notification is taken; notifications that pile up meanwhile collapse
/// into one call.
pub struct LocaleEventBridge {
    notifier: LocaleNotifier,
    registration: Mutex<Registration>,
}

impl LocaleEventBridge {
    /// Create an unregistered bridge listening on `notifier`.
    pub fn new(notifier: LocaleNotifier) -> Self {
        Self {
            notifier,
            registration: Mutex::new(Registration::Unregistered),
        }
    }

    /// Register `on_locale_changed`. A second call while registered is a no-op
    /// returning the existing id.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe<F, Fut>(&self, on_locale_changed: F) -> SubscriptionId
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut registration = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Registration::Registered { id, .. } = &*registration {
            debug!("Locale change listener already registered ({:?})", id);
            return *id;
        }

        let callback: Callback = Arc::new(move || on_locale_changed().boxed());
        let id = SubscriptionId(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed));
        let receiver = self.notifier.listen();
        let task = tokio::spawn(listen(receiver, callback));

        *registration = Registration::Registered { id, task };
        info!("Successfully registered locale change listener");
        id
    }

    /// Whether a listener is currently registered.
    pub fn is_subscribed(&self) -> bool {
        matches!(
            *self
                .registration
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
            Registration::Registered { .. }
        )
    }

    /// Stop the listener. Safe to call any number of times.
    pub fn unsubscribe(&self) {
        let previous = std::mem::replace(
            &mut *self
                .registration
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
            Registration::Unregistered,
        );

        if let Registration::Registered { id, task } = previous {
            task.abort();
            info!("Unregistered locale change listener ({:?})", id);
        }
    }
}

impl Drop for LocaleEventBridge {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

async fn listen(mut receiver: broadcast::Receiver<LocaleChanged>, callback: Callback) {
    loop {
        match receiver.recv().await {
            Ok(LocaleChanged) => {}
            Err(RecvError::Lagged(skipped)) => {
                debug!("Skipped {} queued locale notifications", skipped);
            }
            Err(RecvError::Closed) => break,
        }

        // Anything already queued is covered by the call below
        loop {
            match receiver.try_recv() {
                Ok(LocaleChanged) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        callback().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    async fn wait_for(counter: &AtomicUsize, expected: usize) -> bool {
        for _ in 0..100 {
            if counter.load(Ordering::SeqCst) >= expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    fn counting_callback(
        counter: &Arc<AtomicUsize>,
    ) -> impl Fn() -> futures::future::Ready<()> + Send + Sync + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(())
        }
    }

    #[tokio::test]
    async fn test_notification_invokes_callback() {
        let notifier = LocaleNotifier::new();
        let bridge = LocaleEventBridge::new(notifier.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        bridge.subscribe(counting_callback(&calls));
        assert!(bridge.is_subscribed());

        assert_eq!(notifier.notify(), 1);
        assert!(wait_for(&calls, 1).await);
    }

    #[tokio::test]
    async fn test_subscribe_is_idempotent() {
        let notifier = LocaleNotifier::new();
        let bridge = LocaleEventBridge::new(notifier.clone());
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));

        let first = bridge.subscribe(counting_callback(&first_calls));
        let second = bridge.subscribe(counting_callback(&second_calls));
        assert_eq!(first, second);

        // Only one listener exists on the channel
        assert_eq!(notifier.notify(), 1);
        assert!(wait_for(&first_calls, 1).await);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_is_repeatable() {
        let notifier = LocaleNotifier::new();
        let bridge = LocaleEventBridge::new(notifier.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        bridge.subscribe(counting_callback(&calls));
        bridge.unsubscribe();
        bridge.unsubscribe();
        assert!(!bridge.is_subscribed());

        // Give the aborted task a chance to drop its receiver
        tokio::time::sleep(Duration::from_millis(20)).await;
        notifier.notify();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resubscribe_after_unsubscribe_gets_new_id() {
        let notifier = LocaleNotifier::new();
        let bridge = LocaleEventBridge::new(notifier.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let first = bridge.subscribe(counting_callback(&calls));
        bridge.unsubscribe();
        let second = bridge.subscribe(counting_callback(&calls));

        assert_ne!(first, second);
        assert!(bridge.is_subscribed());
    }

    #[tokio::test]
    async fn test_burst_of_notifications_is_coalesced() {
        let notifier = LocaleNotifier::new();
        let bridge = LocaleEventBridge::new(notifier.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        bridge.subscribe(counting_callback(&calls));

        // No await between sends: the listener sees them all queued at once
        for _ in 0..(NOTIFICATION_CAPACITY * 2) {
            notifier.notify();
        }

        assert!(wait_for(&calls, 1).await);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notify_without_listeners() {
        let notifier = LocaleNotifier::new();
        assert_eq!(notifier.notify(), 0);
    }
}
