use std::time::Duration;

use tokio::time::timeout;

use super::*;

fn notifier(buffer: usize) -> UpdateNotifier {
    UpdateNotifier::new(&WatchConfig {
        watcher_buffer_size: buffer,
    })
}

#[tokio::test]
async fn test_publish_fans_out_to_every_subscriber() {
    let notifier = notifier(4);
    let mut a = notifier.subscribe();
    let mut b = notifier.subscribe();
    let mut c = notifier.subscribe();

    let id = CryptoId::generate();
    assert_eq!(notifier.publish(id), 3);

    assert_eq!(a.recv().await, Some(id));
    assert_eq!(b.recv().await, Some(id));
    assert_eq!(c.recv().await, Some(id));
}

#[tokio::test]
async fn test_publish_without_subscribers_does_not_block() {
    let notifier = notifier(1);
    let result = timeout(Duration::from_millis(100), async { notifier.publish(CryptoId::generate()) }).await;
    assert_eq!(result.unwrap(), 0);
}

#[tokio::test]
async fn test_drop_unregisters_subscriber() {
    let notifier = notifier(4);
    let a = notifier.subscribe();
    let b = notifier.subscribe();
    assert_eq!(notifier.subscriber_count(), 2);
    assert_ne!(a.id(), b.id());

    drop(a);
    assert_eq!(notifier.subscriber_count(), 1);
    assert_eq!(notifier.publish(CryptoId::generate()), 1);

    drop(b);
    assert_eq!(notifier.subscriber_count(), 0);
}

#[tokio::test]
async fn test_full_queue_drops_only_for_slow_subscriber() {
    let notifier = notifier(1);
    let mut slow = notifier.subscribe();
    let mut fast = notifier.subscribe();

    let first = CryptoId::generate();
    let second = CryptoId::generate();
    let dropped_before = DROPPED_CHANGE_EVENTS.get();

    notifier.publish(first);
    assert_eq!(fast.recv().await, Some(first));

    // `slow` still holds `first`, so `second` cannot be queued for it
    assert_eq!(notifier.publish(second), 1);
    assert!(DROPPED_CHANGE_EVENTS.get() > dropped_before);

    assert_eq!(fast.recv().await, Some(second));
    assert_eq!(slow.recv().await, Some(first));
    assert!(timeout(Duration::from_millis(50), slow.recv()).await.is_err());
}

#[tokio::test]
async fn test_events_keep_publish_order_per_subscriber() {
    let notifier = notifier(8);
    let mut sub = notifier.subscribe();

    let ids: Vec<CryptoId> = (0..5).map(|_| CryptoId::generate()).collect();
    for id in &ids {
        notifier.publish(*id);
    }
    for id in &ids {
        assert_eq!(sub.recv().await, Some(*id));
    }
}

#[tokio::test]
async fn test_clones_share_registry() {
    let notifier = notifier(2);
    let publisher = notifier.clone();
    let mut sub = notifier.subscribe();

    let id = CryptoId::generate();
    assert_eq!(publisher.publish(id), 1);
    assert_eq!(sub.recv().await, Some(id));
}
