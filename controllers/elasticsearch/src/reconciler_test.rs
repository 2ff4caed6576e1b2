//! Unit tests for the ElasticsearchCluster reconciler helpers

#[cfg(test)]
mod tests {
    use crate::error::ControllerError;
    use crate::reconciler::{secret_value, status_changed, status_from_state};
    use chrono::{TimeZone, Utc};
    use crds::{ClusterPhase, ElasticsearchClusterStatus};
    use es_client::{HealthStatus, License, MockEsClient};
    use k8s_openapi::ByteString;
    use k8s_openapi::api::core::v1::Secret;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use observer::State;
    use std::collections::BTreeMap;

    fn secret(entries: &[(&str, &[u8])]) -> Secret {
        let data: BTreeMap<String, ByteString> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), ByteString(v.to_vec())))
            .collect();
        Secret {
            metadata: ObjectMeta {
                name: Some("quickstart-es-elastic-user".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            data: Some(data),
            ..Default::default()
        }
    }

    fn observed(status: HealthStatus) -> State {
        State {
            cluster_health: Some(MockEsClient::health_with_status(status)),
            cluster_license: Some(License {
                uid: "uid".to_string(),
                license_type: "platinum".to_string(),
                status: "active".to_string(),
                expiry_date_in_millis: None,
            }),
        }
    }

    #[test]
    fn test_status_from_unknown_state() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let status = status_from_state(&State::default(), now);

        assert_eq!(status.phase, ClusterPhase::Unknown);
        assert_eq!(status.cluster_name, None);
        assert_eq!(status.number_of_nodes, None);
        assert_eq!(status.license_type, None);
        assert_eq!(status.last_observed, Some(now));
    }

    #[test]
    fn test_status_from_observed_state() {
        let status = status_from_state(&observed(HealthStatus::Yellow), Utc::now());

        assert_eq!(status.phase, ClusterPhase::Yellow);
        assert_eq!(status.cluster_name.as_deref(), Some("mock-cluster"));
        assert_eq!(status.number_of_nodes, Some(1));
        assert_eq!(status.license_type.as_deref(), Some("platinum"));
    }

    #[test]
    fn test_status_changed_ignores_timestamp() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap();
        let current = status_from_state(&observed(HealthStatus::Green), earlier);
        let same = status_from_state(&observed(HealthStatus::Green), later);
        let degraded = status_from_state(&observed(HealthStatus::Red), later);

        assert!(!status_changed(Some(&current), &same));
        assert!(status_changed(Some(&current), &degraded));
        assert!(status_changed(None, &same));
        assert!(status_changed(Some(&ElasticsearchClusterStatus::default()), &same));
    }

    #[test]
    fn test_secret_value() {
        let secret = secret(&[("username", b"elastic".as_slice()), ("password", b"changeme".as_slice())]);
        assert_eq!(secret_value(&secret, "username").unwrap(), "elastic");
        assert_eq!(secret_value(&secret, "password").unwrap(), "changeme");
    }

    #[test]
    fn test_secret_value_missing_key() {
        let secret = secret(&[("username", b"elastic".as_slice())]);
        assert!(matches!(
            secret_value(&secret, "password"),
            Err(ControllerError::InvalidSecret(name, _)) if name == "quickstart-es-elastic-user"
        ));
    }

    #[test]
    fn test_secret_value_invalid_utf8() {
        let secret = secret(&[("ca.crt", [0xffu8, 0xfe].as_slice())]);
        assert!(matches!(
            secret_value(&secret, "ca.crt"),
            Err(ControllerError::InvalidSecret(_, _))
        ));
    }
}
