//! Unit tests for the observer manager

#[cfg(test)]
mod tests {
    use crate::{ObserverManager, Settings};
    use crds::NamespacedName;
    use es_client::{BasicAuth, EsClientTrait, HealthStatus, MockEsClient};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    fn manager() -> ObserverManager<MockEsClient> {
        ObserverManager::new(Settings::new(Duration::from_secs(10), Duration::from_secs(60)))
    }

    fn cluster(name: &str) -> NamespacedName {
        NamespacedName::new("default", name)
    }

    fn client(endpoint: &str) -> Arc<MockEsClient> {
        Arc::new(MockEsClient::new(endpoint))
    }

    fn as_set(names: Vec<NamespacedName>) -> HashSet<NamespacedName> {
        names.into_iter().collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_observe_reuses_observer_for_equal_client() {
        let manager = manager();
        let a = cluster("a");

        let first = manager.observe(&a, client("https://a:9200")).await;
        for _ in 0..10 {
            // A fresh but equal client must not cause churn.
            let again = manager.observe(&a, client("https://a:9200")).await;
            assert!(Arc::ptr_eq(&first, &again));
        }

        assert!(!first.is_stopped());
        assert_eq!(manager.list(), vec![a]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observe_replaces_observer_on_endpoint_change() {
        let manager = manager();
        let a = cluster("a");

        let first = manager.observe(&a, client("https://a:9200")).await;
        let second = manager.observe(&a, client("https://a-new:9200")).await;

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(first.is_stopped());
        assert!(!second.is_stopped());
        assert_eq!(second.client().endpoint(), "https://a-new:9200");
        assert!(Arc::ptr_eq(&manager.get(&a).unwrap(), &second));
        assert_eq!(manager.list().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observe_replaces_observer_on_credentials_change() {
        let manager = manager();
        let a = cluster("a");
        let with_user = |password: &str| {
            Arc::new(MockEsClient::new("https://a:9200").with_user(BasicAuth::new("elastic", password)))
        };

        let first = manager.observe(&a, with_user("one")).await;
        let same = manager.observe(&a, with_user("one")).await;
        let rotated = manager.observe(&a, with_user("two")).await;

        assert!(Arc::ptr_eq(&first, &same));
        assert!(!Arc::ptr_eq(&first, &rotated));
        assert!(first.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_observe_replaces_observer_on_ca_change() {
        let manager = manager();
        let a = cluster("a");
        let with_ca = |ca: &str| {
            Arc::new(MockEsClient::new("https://a:9200").with_ca_certs(vec![ca.to_string()]))
        };

        let first = manager.observe(&a, with_ca("ca-1")).await;
        let second = manager.observe(&a, with_ca("ca-2")).await;

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(first.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replaced_observer_stops_polling() {
        let manager = manager();
        let a = cluster("a");
        let old_client = client("https://a:9200");

        manager.observe(&a, Arc::clone(&old_client)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        manager.observe(&a, client("https://a-new:9200")).await;

        let calls = old_client.health_calls();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(old_client.health_calls(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observed_state_resolver_returns_cached_state() {
        let manager = manager();
        let a = cluster("a");
        let c = client("https://a:9200");

        // Nothing observed before the observer task got to run.
        let state = manager.observed_state_resolver(&a, Arc::clone(&c)).await;
        assert!(state.is_unknown());

        tokio::time::sleep(Duration::from_millis(10)).await;
        let state = manager.observed_state_resolver(&a, Arc::clone(&c)).await;
        assert_eq!(state.health_status(), Some(HealthStatus::Green));

        c.set_health(Some(MockEsClient::health_with_status(HealthStatus::Yellow)));
        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = manager.observed_state_resolver(&a, Arc::clone(&c)).await;
        assert_eq!(state.health_status(), Some(HealthStatus::Yellow));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_observing_removes_entry() {
        let manager = manager();
        let a = cluster("a");

        let first = manager.observe(&a, client("https://a:9200")).await;
        manager.stop_observing(&a).await;

        assert!(first.is_stopped());
        assert!(manager.list().is_empty());
        assert!(manager.get(&a).is_none());

        // A later observation never reuses the stopped observer.
        let second = manager.observe(&a, client("https://a:9200")).await;
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!second.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_observing_is_idempotent() {
        let manager = manager();
        let a = cluster("a");

        manager.stop_observing(&cluster("never-observed")).await;

        manager.observe(&a, client("https://a:9200")).await;
        manager.stop_observing(&a).await;
        manager.stop_observing(&a).await;

        assert!(manager.list().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_observing_leaves_other_clusters() {
        let manager = manager();
        let a = cluster("a");
        let b = cluster("b");

        manager.observe(&a, client("https://a:9200")).await;
        let observer_b = manager.observe(&b, client("https://b:9200")).await;
        manager.stop_observing(&a).await;

        assert_eq!(manager.list(), vec![b]);
        assert!(!observer_b.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_observer_signals_displaced_observer() {
        let manager = manager();
        let a = cluster("a");

        let first = manager.create_observer(&a, client("https://a:9200"));
        let second = manager.create_observer(&a, client("https://a:9200"));

        assert!(first.is_stopped());
        assert!(!second.is_stopped());
        assert!(Arc::ptr_eq(&manager.get(&a).unwrap(), &second));
        assert_eq!(manager.list().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_returns_observed_clusters() {
        let manager = manager();
        assert!(manager.list().is_empty());

        for name in ["a", "b", "c"] {
            manager.observe(&cluster(name), client(&format!("https://{}:9200", name))).await;
        }
        manager.stop_observing(&cluster("b")).await;

        assert_eq!(as_set(manager.list()), as_set(vec![cluster("a"), cluster("c")]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all() {
        let manager = manager();
        let observers = vec![
            manager.observe(&cluster("a"), client("https://a:9200")).await,
            manager.observe(&cluster("b"), client("https://b:9200")).await,
        ];

        manager.stop_all().await;

        assert!(manager.list().is_empty());
        assert!(observers.iter().all(|o| o.is_stopped()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_observers_use_manager_settings() {
        let settings = Settings::new(Duration::from_secs(3), Duration::from_secs(1));
        let manager = ObserverManager::new(settings);

        let observer = manager.observe(&cluster("a"), client("https://a:9200")).await;

        assert_eq!(manager.settings(), &settings);
        assert_eq!(observer.settings(), &settings);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_end_to_end() {
        let manager = manager();
        let a = cluster("a");
        let c1 = client("https://a:9200");
        let c2 = client("https://a-rotated:9200");

        // Resolve(A, C1) creates W1.
        let w1 = manager.observe(&a, Arc::clone(&c1)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(
            manager.observed_state_resolver(&a, Arc::clone(&c1)).await.health_status(),
            Some(HealthStatus::Green)
        );
        assert!(Arc::ptr_eq(&manager.get(&a).unwrap(), &w1));

        // Resolve(A, C2) stops W1 and creates W2.
        let w2 = manager.observe(&a, Arc::clone(&c2)).await;
        assert!(w1.is_stopped());
        assert!(!Arc::ptr_eq(&w1, &w2));
        assert_eq!(manager.list(), vec![a.clone()]);

        // StopObserving(A) stops W2 and removes the entry.
        manager.stop_observing(&a).await;
        assert!(w2.is_stopped());
        assert!(manager.list().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacement_and_deletion_reach_same_end_state() {
        let replaced = manager();
        let recreated = manager();
        let a = cluster("a");

        let old_replaced = replaced.observe(&a, client("https://a:9200")).await;
        let new_replaced = replaced.observe(&a, client("https://b:9200")).await;

        let old_recreated = recreated.observe(&a, client("https://a:9200")).await;
        recreated.stop_observing(&a).await;
        let new_recreated = recreated.observe(&a, client("https://b:9200")).await;

        assert_eq!(replaced.list(), recreated.list());
        assert!(old_replaced.is_stopped() && old_recreated.is_stopped());
        assert!(!new_replaced.is_stopped() && !new_recreated.is_stopped());
        assert_eq!(new_replaced.client().endpoint(), new_recreated.client().endpoint());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_observe_and_stop() {
        let manager = Arc::new(ObserverManager::<MockEsClient>::new(Settings::new(
            Duration::from_millis(100),
            Duration::from_secs(1),
        )));
        let clusters: Vec<NamespacedName> = (0..4).map(|i| cluster(&format!("es-{}", i))).collect();
        let endpoints = ["https://one:9200", "https://two:9200"];

        let mut tasks = Vec::new();
        for worker in 0..32usize {
            let manager = Arc::clone(&manager);
            let clusters = clusters.clone();
            tasks.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                for step in 0..50usize {
                    let target = &clusters[(worker + step) % clusters.len()];
                    match (worker * 7 + step * 3) % 5 {
                        0 => manager.stop_observing(target).await,
                        n => {
                            let endpoint = endpoints[n % endpoints.len()];
                            seen.push(manager.observe(target, client(endpoint)).await);
                        }
                    }
                }
                seen
            }));
        }

        let mut seen = Vec::new();
        for task in tasks {
            seen.extend(task.await.unwrap());
        }

        // At most one entry per cluster, and every entry is live.
        let listed = manager.list();
        assert_eq!(as_set(listed.clone()).len(), listed.len());
        for name in &listed {
            assert!(!manager.get(name).unwrap().is_stopped());
        }

        // No observer outlives its entry.
        for observer in &seen {
            let registered = manager
                .get(observer.cluster())
                .is_some_and(|current| Arc::ptr_eq(&current, observer));
            assert!(registered || observer.is_stopped());
        }

        manager.stop_all().await;
        assert!(manager.list().is_empty());
        assert!(seen.iter().all(|o| o.is_stopped()));
    }
}
