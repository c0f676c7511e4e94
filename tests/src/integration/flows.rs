//! # Broker Flow Tests
//!
//! Claim / finalize / abandon flows driven the way a broker drives them:
//! queues looked up by endpoint, workers talking to the port trait only.
//!
//! ## Flows Tested:
//!
//! 1. **Produce → Consume**: priority precedence and FIFO tiebreak
//! 2. **Claim → Finalize**: peek under a transaction, then dequeue it
//! 3. **Claim → Abandon**: unlock returns claims in original order
//! 4. **Abort across endpoints**: `unlock_all` over several queues

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mq_01_delivery_queue::{
        adapters::{topics, QueueEvent, RecordingPublisher},
        QueueConfig, QueueError, QueueManager, QueueManagerConfig, TransactionalQueueApi,
    };
    use shared_types::{MessageId, Priority, TransactionToken};

    use crate::support::{bytes_message, init_tracing, message};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn drain(queue: &dyn TransactionalQueueApi<u64>, tx: Option<TransactionToken>) -> Vec<u64> {
        std::iter::from_fn(|| queue.dequeue(tx))
            .map(|m| m.payload)
            .collect()
    }

    fn interleaved_setup(queue: &dyn TransactionalQueueApi<u64>) -> (TransactionToken, TransactionToken) {
        let t0 = TransactionToken::new();
        let t1 = TransactionToken::new();
        let owners = [Some(t0), Some(t1), Some(t0), Some(t1), None, None, None];
        for (value, owner) in owners.into_iter().enumerate() {
            queue
                .enqueue(owner, message(value as u128, Priority::Normal))
                .unwrap();
        }
        (t0, t1)
    }

    // =============================================================================
    // PRODUCE → CONSUME
    // =============================================================================

    #[test]
    fn test_one_per_level_drains_highest_first() {
        init_tracing();
        let manager: QueueManager<u64> = QueueManager::new();
        let queue = manager.get_or_create("orders");

        for (value, priority) in Priority::ALL.into_iter().enumerate() {
            queue.enqueue(None, message(value as u128, priority)).unwrap();
        }

        assert_eq!(drain(queue.as_ref(), None), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_two_per_level_keeps_fifo_within_level() {
        init_tracing();
        let manager: QueueManager<u64> = QueueManager::new();
        let queue = manager.get_or_create("orders");

        for value in 0..10u128 {
            let priority = Priority::from_ordinal((value / 2) as usize).unwrap();
            queue.enqueue(None, message(value, priority)).unwrap();
        }

        assert_eq!(
            drain(queue.as_ref(), None),
            vec![8, 9, 6, 7, 4, 5, 2, 3, 0, 1]
        );
    }

    #[test]
    fn test_byte_payloads_round_trip_through_port() {
        init_tracing();
        let manager: QueueManager = QueueManager::new();
        let queue: Arc<dyn TransactionalQueueApi<Vec<u8>>> = manager.get_or_create("mail");

        queue
            .enqueue(None, bytes_message(1, Priority::Low, "later"))
            .unwrap();
        queue
            .enqueue(None, bytes_message(2, Priority::VeryHigh, "urgent"))
            .unwrap();

        let first = queue.dequeue(None).unwrap();
        assert_eq!(first.id, MessageId::from_u128(2));
        assert_eq!(first.payload, b"urgent".to_vec());
        assert_eq!(queue.count(), 1);
        assert_eq!(queue.endpoint(), "mail");
    }

    // =============================================================================
    // CLAIM → FINALIZE / ABANDON
    // =============================================================================

    #[test]
    fn test_transactions_only_see_their_own_and_unlocked() {
        init_tracing();
        let manager: QueueManager<u64> = QueueManager::new();
        let queue = manager.get_or_create("orders");
        let (t0, t1) = interleaved_setup(queue.as_ref());

        assert_eq!(queue.dequeue(None).unwrap().payload, 4);
        assert_eq!(queue.dequeue(Some(t1)).unwrap().payload, 1);
        assert_eq!(queue.dequeue(Some(t0)).unwrap().payload, 0);
        assert_eq!(queue.dequeue(Some(t1)).unwrap().payload, 3);
        assert_eq!(queue.dequeue(Some(t0)).unwrap().payload, 2);
        assert_eq!(queue.dequeue(Some(t1)).unwrap().payload, 5);
        assert_eq!(queue.dequeue(Some(t0)).unwrap().payload, 6);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_abandon_restores_original_order() {
        init_tracing();
        let manager: QueueManager<u64> = QueueManager::new();
        let queue = manager.get_or_create("orders");
        let (t0, t1) = interleaved_setup(queue.as_ref());

        assert_eq!(queue.unlock(t0), 2);
        assert_eq!(queue.unlock(t1), 2);

        assert_eq!(drain(queue.as_ref(), None), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_peek_claims_then_dequeue_finalizes() {
        init_tracing();
        let manager: QueueManager<u64> = QueueManager::new();
        let queue = manager.get_or_create("orders");
        let (t0, t1) = interleaved_setup(queue.as_ref());
        queue.unlock(t0);
        queue.unlock(t1);

        assert_eq!(queue.peek(Some(t0)).unwrap().payload, 0);
        assert_eq!(queue.peek(Some(t1)).unwrap().payload, 1);
        assert_eq!(queue.peek(Some(t0)).unwrap().payload, 0);
        assert_eq!(queue.peek(Some(t1)).unwrap().payload, 1);
        assert_eq!(queue.peek(None).unwrap().payload, 2);
        assert_eq!(queue.dequeue(None).unwrap().payload, 2);
        assert_eq!(queue.dequeue(Some(t0)).unwrap().payload, 0);
        assert_eq!(queue.dequeue(Some(t1)).unwrap().payload, 1);
        assert_eq!(queue.dequeue(Some(t0)).unwrap().payload, 3);
        assert_eq!(queue.dequeue(Some(t1)).unwrap().payload, 4);
        assert_eq!(queue.count(), 2);
    }

    #[test]
    fn test_unknown_transaction_unlock_is_noop() {
        init_tracing();
        let manager: QueueManager<u64> = QueueManager::new();
        let queue = manager.get_or_create("orders");
        queue.enqueue(None, message(1, Priority::High)).unwrap();

        assert_eq!(queue.unlock(TransactionToken::new()), 0);
        assert_eq!(queue.count(), 1);
        assert_eq!(queue.status().locked, 0);
    }

    #[test]
    fn test_duplicate_rejected_without_side_effects() {
        init_tracing();
        let manager: QueueManager<u64> = QueueManager::new();
        let queue = manager.get_or_create("orders");
        let tx = TransactionToken::new();
        queue.enqueue(None, message(7, Priority::Low)).unwrap();
        let before = queue.status();

        let result = queue.enqueue(Some(tx), message(7, Priority::VeryHigh));

        assert_eq!(
            result,
            Err(QueueError::DuplicateMessage(MessageId::from_u128(7)))
        );
        assert_eq!(queue.status(), before);
        assert!(queue.held_by(tx).is_empty());
    }

    // =============================================================================
    // ABORT ACROSS ENDPOINTS
    // =============================================================================

    #[test]
    fn test_abort_releases_claims_in_every_queue() {
        init_tracing();
        let publisher = Arc::new(RecordingPublisher::new());
        let config = QueueManagerConfig {
            queues: vec![
                QueueConfig::new("orders"),
                QueueConfig::new("billing").with_max_depth(4),
            ],
        };
        let manager: QueueManager<u64> = QueueManager::new()
            .with_publisher(publisher.clone())
            .with_queues(config)
            .unwrap();

        let orders = manager.get("orders").unwrap();
        let billing = manager.get("billing").unwrap();
        orders.enqueue(None, message(1, Priority::Normal)).unwrap();
        billing.enqueue(None, message(2, Priority::Normal)).unwrap();

        let tx = TransactionToken::new();
        assert_eq!(orders.peek(Some(tx)).unwrap().payload, 1);
        assert_eq!(billing.peek(Some(tx)).unwrap().payload, 2);
        assert!(orders.peek(None).is_none());
        assert!(billing.dequeue(None).is_none());

        assert_eq!(manager.unlock_all(tx), 2);

        assert_eq!(orders.dequeue(None).unwrap().payload, 1);
        assert_eq!(billing.dequeue(None).unwrap().payload, 2);

        let claimed = publisher.events_for(topics::CLAIMED);
        assert_eq!(claimed.len(), 2);
        let released = publisher.events_for(topics::RELEASED);
        assert_eq!(released.len(), 2);
        assert!(released.iter().all(|e| matches!(
            e,
            QueueEvent::Released { transaction, message_ids, .. }
                if *transaction == tx && message_ids.len() == 1
        )));
    }

    #[test]
    fn test_bounded_queue_rejects_when_full() {
        init_tracing();
        let manager: QueueManager<u64> = QueueManager::new();
        let queue = manager
            .create(QueueConfig::new("small").with_max_depth(2))
            .unwrap();

        queue.enqueue(None, message(1, Priority::Normal)).unwrap();
        queue.enqueue(None, message(2, Priority::Normal)).unwrap();
        assert_eq!(
            queue.enqueue(None, message(3, Priority::Normal)),
            Err(QueueError::QueueFull { capacity: 2 })
        );

        queue.dequeue(None).unwrap();
        assert!(queue.enqueue(None, message(3, Priority::Normal)).is_ok());
    }
}
