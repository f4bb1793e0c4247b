//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - Directory → Dispatcher → ConsumerFactory 端到端测试
//! - 并发分发正确性

#[cfg(test)]
mod contract_tests {
    use contracts::{ConsumerType, MessageType};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译，token 身份稳定
        struct Probe;
        assert_eq!(MessageType::of::<Probe>(), MessageType::of::<Probe>());
        assert_ne!(
            MessageType::of::<Probe>().id(),
            ConsumerType::of::<String>().id()
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use consumer_factory::{ConsumerFactory, ConsumerFactoryBuilder};
    use contracts::{Consume, ContractError};
    use directory::{MessageDirectory, MessageDirectoryBuilder};
    use dispatcher::{DispatchError, SingleConsumerDispatcher};
    use observability::{record_dispatch_failure, record_message_dispatched, record_message_unrouted};

    struct OrderPlaced {
        order_id: u64,
    }

    struct PaymentReceived {
        amount_cents: u64,
    }

    struct ShipmentRequested;

    /// Per-scope unit of work shared by a consumer and its dependencies
    #[derive(Clone)]
    struct UnitOfWork {
        seq: u64,
    }

    struct OrderPlacedHandler {
        received: Arc<Mutex<Vec<u64>>>,
    }

    impl Consume<OrderPlaced> for OrderPlacedHandler {
        fn consume(&mut self, message: &OrderPlaced) -> Result<(), ContractError> {
            self.received.lock().map_err(|_| {
                ContractError::consume(std::any::type_name::<Self>(), "receipt log poisoned")
            })?.push(message.order_id);
            Ok(())
        }
    }

    struct PaymentReceivedHandler {
        unit_ids: Arc<Mutex<Vec<u64>>>,
        unit: UnitOfWork,
    }

    impl Consume<PaymentReceived> for PaymentReceivedHandler {
        fn consume(&mut self, message: &PaymentReceived) -> Result<(), ContractError> {
            if message.amount_cents == 0 {
                return Err(ContractError::consume(
                    std::any::type_name::<Self>(),
                    "zero-amount payment",
                ));
            }
            self.unit_ids.lock().map_err(|_| {
                ContractError::consume(std::any::type_name::<Self>(), "unit log poisoned")
            })?.push(self.unit.seq);
            Ok(())
        }
    }

    fn order_directory() -> Arc<MessageDirectory> {
        Arc::new(
            MessageDirectoryBuilder::new()
                .declare::<OrderPlaced, OrderPlacedHandler>()
                .build(),
        )
    }

    #[test]
    fn test_e2e_single_consumer_pipeline() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let handler_received = Arc::clone(&received);

        let factory = Arc::new(
            ConsumerFactoryBuilder::new()
                .register::<OrderPlacedHandler, _>(move |_| {
                    Ok(OrderPlacedHandler {
                        received: Arc::clone(&handler_received),
                    })
                })
                .build(),
        );

        let dispatcher =
            SingleConsumerDispatcher::build(order_directory(), factory.clone()).unwrap();

        // routed message: dispatched exactly once to its one consumer
        assert!(dispatcher
            .dispatch_message("orders", &OrderPlaced { order_id: 42 })
            .unwrap());
        record_message_dispatched("orders", std::any::type_name::<OrderPlacedHandler>());

        // unregistered message type: ignored by this dispatcher, no resolution
        assert!(!dispatcher
            .dispatch_message("orders", &ShipmentRequested)
            .unwrap());
        record_message_unrouted("orders");

        assert_eq!(*received.lock().unwrap(), vec![42]);
        assert_eq!(factory.scopes_created(), 1);
        assert_eq!(factory.live_scopes(), 0);
    }

    #[test]
    fn test_misclassified_event_rejected_at_startup() {
        struct FirstPaymentHandler;
        struct SecondPaymentHandler;

        impl Consume<PaymentReceived> for FirstPaymentHandler {
            fn consume(&mut self, _message: &PaymentReceived) -> Result<(), ContractError> {
                Ok(())
            }
        }
        impl Consume<PaymentReceived> for SecondPaymentHandler {
            fn consume(&mut self, _message: &PaymentReceived) -> Result<(), ContractError> {
                Ok(())
            }
        }

        let directory = Arc::new(
            MessageDirectoryBuilder::new()
                .declare::<OrderPlaced, OrderPlacedHandler>()
                .declare::<PaymentReceived, FirstPaymentHandler>()
                .declare::<PaymentReceived, SecondPaymentHandler>()
                .build(),
        );
        let resolver = Arc::new(ConsumerFactoryBuilder::new().build());

        let err = SingleConsumerDispatcher::build(directory, resolver).unwrap_err();

        assert!(matches!(err, DispatchError::MultipleConsumers { .. }));
        assert!(err.to_string().contains("PaymentReceived"));
    }

    #[test]
    fn test_per_dispatch_unit_of_work() {
        let unit_ids = Arc::new(Mutex::new(Vec::new()));
        let handler_unit_ids = Arc::clone(&unit_ids);
        let next_unit = Arc::new(AtomicU64::new(0));
        let provider_next = Arc::clone(&next_unit);

        let factory = Arc::new(
            ConsumerFactoryBuilder::new()
                .provide::<UnitOfWork, _>(move || UnitOfWork {
                    seq: provider_next.fetch_add(1, Ordering::Relaxed),
                })
                .register::<PaymentReceivedHandler, _>(move |services| {
                    Ok(PaymentReceivedHandler {
                        unit_ids: Arc::clone(&handler_unit_ids),
                        unit: services.get::<UnitOfWork>()?,
                    })
                })
                .build(),
        );
        let directory = Arc::new(
            MessageDirectoryBuilder::new()
                .declare::<PaymentReceived, PaymentReceivedHandler>()
                .build(),
        );
        let dispatcher = SingleConsumerDispatcher::build(directory, factory).unwrap();

        for amount_cents in [100, 250, 400] {
            dispatcher
                .dispatch_message("payments", &PaymentReceived { amount_cents })
                .unwrap();
        }

        // each dispatch ran in its own scope with a fresh unit of work
        assert_eq!(*unit_ids.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_failed_dispatch_does_not_corrupt_dispatcher() {
        let unit_ids = Arc::new(Mutex::new(Vec::new()));
        let handler_unit_ids = Arc::clone(&unit_ids);

        let factory = Arc::new(
            ConsumerFactoryBuilder::new()
                .provide::<UnitOfWork, _>(|| UnitOfWork { seq: 0 })
                .register::<PaymentReceivedHandler, _>(move |services| {
                    Ok(PaymentReceivedHandler {
                        unit_ids: Arc::clone(&handler_unit_ids),
                        unit: services.get::<UnitOfWork>()?,
                    })
                })
                .build(),
        );
        let directory = Arc::new(
            MessageDirectoryBuilder::new()
                .declare::<PaymentReceived, PaymentReceivedHandler>()
                .build(),
        );
        let dispatcher =
            SingleConsumerDispatcher::build(directory, factory.clone()).unwrap();

        let err = dispatcher
            .dispatch_message("payments", &PaymentReceived { amount_cents: 0 })
            .unwrap_err();
        assert!(matches!(err, DispatchError::Invocation { .. }));
        record_dispatch_failure("payments", "invocation");
        assert_eq!(factory.live_scopes(), 0);

        assert!(dispatcher
            .dispatch_message("payments", &PaymentReceived { amount_cents: 100 })
            .unwrap());
    }

    /// Two dispatchers chained over one message stream: each claims only the
    /// message types it owns, by the boolean dispatch contract.
    #[test]
    fn test_dispatcher_chain_claims_by_type() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let handler_received = Arc::clone(&received);
        let unit_ids = Arc::new(Mutex::new(Vec::new()));
        let handler_unit_ids = Arc::clone(&unit_ids);

        let order_factory: Arc<ConsumerFactory> = Arc::new(
            ConsumerFactoryBuilder::new()
                .register::<OrderPlacedHandler, _>(move |_| {
                    Ok(OrderPlacedHandler {
                        received: Arc::clone(&handler_received),
                    })
                })
                .build(),
        );
        let payment_factory: Arc<ConsumerFactory> = Arc::new(
            ConsumerFactoryBuilder::new()
                .provide::<UnitOfWork, _>(|| UnitOfWork { seq: 9 })
                .register::<PaymentReceivedHandler, _>(move |services| {
                    Ok(PaymentReceivedHandler {
                        unit_ids: Arc::clone(&handler_unit_ids),
                        unit: services.get::<UnitOfWork>()?,
                    })
                })
                .build(),
        );

        let orders = SingleConsumerDispatcher::build(order_directory(), order_factory).unwrap();
        let payments = SingleConsumerDispatcher::build(
            Arc::new(
                MessageDirectoryBuilder::new()
                    .declare::<PaymentReceived, PaymentReceivedHandler>()
                    .build(),
            ),
            payment_factory,
        )
        .unwrap();

        let stream: Vec<Box<dyn contracts::Message>> = vec![
            Box::new(OrderPlaced { order_id: 1 }),
            Box::new(PaymentReceived { amount_cents: 500 }),
            Box::new(OrderPlaced { order_id: 2 }),
        ];

        for message in &stream {
            let claimed = orders.dispatch_message("bus", message.as_ref()).unwrap()
                || payments.dispatch_message("bus", message.as_ref()).unwrap();
            assert!(claimed);
        }

        assert_eq!(*received.lock().unwrap(), vec![1, 2]);
        assert_eq!(unit_ids.lock().unwrap().len(), 1);
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use consumer_factory::ConsumerFactoryBuilder;
    use contracts::{Consume, ContractError};
    use directory::MessageDirectoryBuilder;
    use dispatcher::SingleConsumerDispatcher;

    struct OrderPlaced {
        order_id: u64,
    }

    struct OrderPlacedHandler {
        total: Arc<AtomicU64>,
    }

    impl Consume<OrderPlaced> for OrderPlacedHandler {
        fn consume(&mut self, message: &OrderPlaced) -> Result<(), ContractError> {
            self.total.fetch_add(message.order_id, Ordering::Relaxed);
            Ok(())
        }
    }

    /// Build completes before any dispatch, then many tasks dispatch through
    /// the frozen routing table concurrently.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_dispatch() {
        let total = Arc::new(AtomicU64::new(0));
        let handler_total = Arc::clone(&total);

        let factory = Arc::new(
            ConsumerFactoryBuilder::new()
                .register::<OrderPlacedHandler, _>(move |_| {
                    Ok(OrderPlacedHandler {
                        total: Arc::clone(&handler_total),
                    })
                })
                .build(),
        );
        let directory = Arc::new(
            MessageDirectoryBuilder::new()
                .declare::<OrderPlaced, OrderPlacedHandler>()
                .build(),
        );
        let dispatcher = Arc::new(
            SingleConsumerDispatcher::build(directory, factory.clone()).unwrap(),
        );

        let tasks = 8u64;
        let per_task = 50u64;

        let mut handles = Vec::new();
        for _ in 0..tasks {
            let dispatcher = Arc::clone(&dispatcher);
            handles.push(tokio::spawn(async move {
                for _ in 0..per_task {
                    let dispatched = dispatcher
                        .dispatch_message("orders", &OrderPlaced { order_id: 1 })
                        .unwrap();
                    assert!(dispatched);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(total.load(Ordering::Relaxed), tasks * per_task);
        assert_eq!(factory.scopes_created(), tasks * per_task);
        assert_eq!(factory.live_scopes(), 0);
        assert_eq!(dispatcher.metrics().dispatched_count(), tasks * per_task);
    }
}

#[cfg(test)]
mod observability_tests {
    use observability::{init_with_config, LogFormat, ObservabilityConfig};

    #[test]
    fn test_init_without_exporter() {
        let config = ObservabilityConfig {
            log_format: LogFormat::Compact,
            metrics_port: None,
            default_log_level: "debug".to_string(),
        };
        // 全局 subscriber 只允许安装一次，本测试独占安装
        init_with_config(config).unwrap();
    }
}
