use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Fan-out bus keyed by connection identity. Holds no drawing state and
/// never looks inside a payload; `T` is whatever the transport carries,
/// so the message schema can evolve without touching this type.
pub struct Relay<T> {
    peers: RwLock<HashMap<Uuid, mpsc::UnboundedSender<T>>>,
}

impl<T> Relay<T> {
    pub fn new() -> Self {
        Self {
            peers: RwLock::new(HashMap::new()),
        }
    }

    pub async fn subscribe(&self, id: Uuid, tx: mpsc::UnboundedSender<T>) {
        self.peers.write().await.insert(id, tx);
    }

    pub async fn unsubscribe(&self, id: Uuid) {
        self.peers.write().await.remove(&id);
    }

    pub async fn len(&self) -> usize {
        self.peers.read().await.len()
    }
}

impl<T> Default for Relay<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Relay<T> {
    /// Forwards `payload` verbatim to every live peer except `from`.
    /// Fire-and-forget: a peer whose channel is gone is pruned and the
    /// message is not retried, so that peer simply misses the update.
    pub async fn publish(&self, from: Uuid, payload: T) {
        let mut stale = Vec::new();
        {
            let peers = self.peers.read().await;
            for (id, tx) in peers.iter() {
                if *id == from {
                    continue;
                }
                if tx.send(payload.clone()).is_err() {
                    stale.push(*id);
                }
            }
        }

        if !stale.is_empty() {
            let mut peers = self.peers.write().await;
            for id in stale {
                peers.remove(&id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn peer(relay: &Relay<String>) -> (Uuid, mpsc::UnboundedReceiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        relay.subscribe(id, tx).await;
        (id, rx)
    }

    #[tokio::test]
    async fn fan_out_reaches_everyone_but_the_sender_exactly_once() {
        let relay = Relay::new();
        let (a, mut rx_a) = peer(&relay).await;
        let (_b, mut rx_b) = peer(&relay).await;
        let (_c, mut rx_c) = peer(&relay).await;

        relay.publish(a, "hello".to_string()).await;

        assert_eq!(rx_b.try_recv().as_deref(), Ok("hello"));
        assert_eq!(rx_c.try_recv().as_deref(), Ok("hello"));
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribed_peers_are_never_attempted_again() {
        let relay = Relay::new();
        let (a, mut rx_a) = peer(&relay).await;
        let (b, _rx_b) = peer(&relay).await;
        let (_c, mut rx_c) = peer(&relay).await;

        relay.unsubscribe(a).await;
        relay.publish(b, "after".to_string()).await;

        assert_eq!(rx_c.try_recv().as_deref(), Ok("after"));
        assert!(rx_a.try_recv().is_err());
        assert_eq!(relay.len().await, 2);
    }

    #[tokio::test]
    async fn peers_with_a_dead_channel_are_pruned() {
        let relay = Relay::new();
        let (a, _rx_a) = peer(&relay).await;
        let (_b, mut rx_b) = peer(&relay).await;
        let (_c, rx_c) = peer(&relay).await;
        drop(rx_c);

        relay.publish(a, "ping".to_string()).await;

        assert_eq!(rx_b.try_recv().as_deref(), Ok("ping"));
        assert_eq!(relay.len().await, 2);
        // The pruned peer stays gone on the next publish.
        relay.publish(a, "pong".to_string()).await;
        assert_eq!(relay.len().await, 2);
    }

    #[tokio::test]
    async fn late_subscribers_see_nothing_until_the_next_publish() {
        let relay = Relay::new();
        let (a, _rx_a) = peer(&relay).await;
        let (_b, mut rx_b) = peer(&relay).await;

        for n in 0..3 {
            relay.publish(a, format!("stroke {n}")).await;
        }

        let (_late, mut rx_late) = peer(&relay).await;
        assert!(rx_late.try_recv().is_err());

        relay.publish(a, "fresh".to_string()).await;
        assert_eq!(rx_late.try_recv().as_deref(), Ok("fresh"));
        // Existing peers got everything.
        for n in 0..3 {
            assert_eq!(rx_b.try_recv().unwrap(), format!("stroke {n}"));
        }
        assert_eq!(rx_b.try_recv().as_deref(), Ok("fresh"));
    }
}
