//! Resource service tests against a mock HTTP server.

mod common;

use common::*;
use datacrunch_client::prelude::*;
use datacrunch_client::types::containers::{
    ComputeResource, Container, ContainerRegistrySettings, CreateDeploymentRequest, EnvVar,
    HealthcheckSettings, QueueLoadTrigger, ScalingOptions, ScalingPolicy, ScalingTriggers,
    UtilizationTrigger, VolumeMount,
};
use datacrunch_client::types::instances::InstanceStatus;
use datacrunch_client::types::ssh_keys::CreateSshKeyRequest;
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, Request, Respond, ResponseTemplate};

#[tokio::test]
async fn test_list_instances() {
    let server = setup_mock_server().await;
    mount_token(&server, "tok1").await;

    Mock::given(method("GET"))
        .and(path("/v1/instances"))
        .and(query_param("status", "running"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": "i-1",
            "instance_type": "1V100.6V",
            "image": "ubuntu-22.04",
            "price_per_hour": "0.89",
            "hostname": "trainer",
            "description": "training box",
            "ip": "203.0.113.7",
            "status": "running",
            "created_at": "2024-05-01T10:00:00Z",
            "ssh_key_ids": ["key-1"],
            "cpu": {"description": "6 CPU", "number_of_cores": 6},
            "gpu": {"description": "1x V100", "number_of_gpus": 1},
            "memory": {"description": "23GB RAM", "size_in_gigabytes": 23},
            "location": "FIN-01",
            "is_spot": false
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let instances = client
        .instances()
        .list(Some(InstanceStatus::Running))
        .await
        .unwrap();

    assert_eq!(instances.len(), 1);
    let instance = &instances[0];
    assert_eq!(instance.id, "i-1");
    assert_eq!(instance.price_per_hour, 0.89);
    assert_eq!(instance.gpu.number_of_gpus, 1);
    assert_eq!(instance.ip.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn test_create_ssh_key_returns_plain_text_id() {
    let server = setup_mock_server().await;
    mount_token(&server, "tok1").await;

    Mock::given(method("POST"))
        .and(path("/v1/sshkeys"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"name": "laptop", "key": "ssh-ed25519 AAAA"})))
        .respond_with(ResponseTemplate::new(201).set_body_string("9f1c2a"))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let id = client
        .ssh_keys()
        .create(&CreateSshKeyRequest::new("laptop", "ssh-ed25519 AAAA"))
        .await
        .unwrap();

    assert_eq!(id, "9f1c2a");
}

/// Echoes the request body back as the response body.
struct Echo;

impl Respond for Echo {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(201)
            .insert_header("content-type", "application/json")
            .set_body_bytes(request.body.clone())
    }
}

fn deployment_request() -> CreateDeploymentRequest {
    let mut container = Container::new("registry.example/llm-server:1.4", 8000);
    container.name = Some("server".to_string());
    container.healthcheck = Some(HealthcheckSettings {
        enabled: true,
        port: Some(8000),
        path: Some("/health".to_string()),
    });
    container.env = vec![
        EnvVar::plain("MODEL", "llama-3-8b"),
        EnvVar::secret("HF_TOKEN", "hf-token"),
    ];
    container.volume_mounts = vec![
        VolumeMount::Scratch {
            mount_path: "/data".to_string(),
        },
        VolumeMount::Shared {
            mount_path: "/models".to_string(),
            volume_id: "vol-1".to_string(),
        },
    ];

    CreateDeploymentRequest {
        name: "llm-server".to_string(),
        containers: vec![container],
        compute: ComputeResource {
            name: "H100".to_string(),
            size: 1,
        },
        container_registry_settings: ContainerRegistrySettings::default(),
        is_spot: false,
        scaling: Some(ScalingOptions {
            min_replica_count: 1,
            max_replica_count: 4,
            scale_down_policy: ScalingPolicy { delay_seconds: 300 },
            scale_up_policy: ScalingPolicy { delay_seconds: 0 },
            queue_message_ttl_seconds: 600,
            concurrent_requests_per_replica: 8,
            scaling_triggers: ScalingTriggers {
                queue_load: Some(QueueLoadTrigger { threshold: 1.0 }),
                gpu_utilization: Some(UtilizationTrigger {
                    enabled: true,
                    threshold: Some(90.0),
                }),
                ..ScalingTriggers::default()
            },
        }),
    }
}

#[tokio::test]
async fn test_deployment_request_survives_round_trip() {
    let server = setup_mock_server().await;
    mount_token(&server, "tok1").await;

    Mock::given(method("POST"))
        .and(path("/v1/container-deployments"))
        .respond_with(Echo)
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let request = deployment_request();

    let echoed: CreateDeploymentRequest = client
        .pipeline()
        .post("/container-deployments", &request)
        .await
        .unwrap();
    assert_eq!(echoed, request);

    let deployment = client.containers().create(&request).await.unwrap();
    assert_eq!(deployment.name, request.name);
    assert_eq!(deployment.containers, request.containers);
    assert_eq!(deployment.scaling, request.scaling);
}

#[tokio::test]
async fn test_delete_deployment_encodes_name() {
    let server = setup_mock_server().await;
    mount_token(&server, "tok1").await;

    Mock::given(method("DELETE"))
        .and(path("/v1/container-deployments/my%20app"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client.containers().delete("my app").await.unwrap();
}

#[tokio::test]
async fn test_volume_trash_and_types() {
    let server = setup_mock_server().await;
    mount_token(&server, "tok1").await;

    Mock::given(method("GET"))
        .and(path("/v1/volumes/trash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": "vol-9",
            "name": "old-data",
            "status": "deleted",
            "size": 50,
            "type": "HDD",
            "location": "FIN-01"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/volume-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "type": "NVMe",
            "price": {"price_per_month_per_gb": 0.2, "cps_per_gb": "0.00027", "currency": "usd"},
            "is_shared_fs": false,
            "iops": "100k"
        }])))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let trash = client.volumes().trash().await.unwrap();
    let types = client.volumes().types().await.unwrap();

    assert_eq!(trash[0].id, "vol-9");
    assert_eq!(types[0].price.as_ref().unwrap().cps_per_gb, Some(0.00027));
    assert_eq!(types[0].extra.get("iops"), Some(&serde_json::json!("100k")));
}
