// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Key = (String, String);

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Paths registered with [`MockService::with_object`] behave like a tiny API
/// server: GET returns the current body and a successful PUT stores the request
/// body. Every request is recorded so tests can assert which calls were made.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<Key, (u16, String)>>>,
    objects: Arc<Mutex<HashMap<String, String>>>,
    requests: Arc<Mutex<Vec<Key>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            objects: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Serve a stored object at `path` that GET returns and PUT replaces
    pub fn with_object(self, path: &str, body: &str) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), body.to_string());
        self
    }

    /// Current body of a stored object
    pub fn object(&self, path: &str) -> Option<serde_json::Value> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .and_then(|body| serde_json::from_str(body).ok())
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "https://kubernetes.default.svc")
    }

    /// All requests seen so far as (method, path)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests seen for a method and path
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    /// Number of requests with a mutating method
    pub fn mutations(&self) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| matches!(m.as_str(), "PUT" | "PATCH" | "POST" | "DELETE"))
            .count()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

fn json_response(status: u16, body: String) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body.into_bytes()))
        .unwrap()
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));

        let scripted = self
            .responses
            .lock()
            .unwrap()
            .get(&(method.clone(), path.clone()))
            .cloned();
        let objects = self.objects.clone();

        Box::pin(respond(req, method, path, scripted, objects))
    }
}

async fn respond(
    req: Request<Body>,
    method: String,
    path: String,
    scripted: Option<(u16, String)>,
    objects: Arc<Mutex<HashMap<String, String>>>,
) -> Result<Response<Body>, tower::BoxError> {
    if let Some((status, body)) = scripted {
        return Ok(json_response(status, body));
    }

    let stored = objects.lock().unwrap().get(&path).cloned();
    match (method.as_str(), stored) {
        ("GET", Some(body)) => Ok(json_response(200, body)),
        ("PUT", Some(_)) => {
            let bytes = req.into_body().collect().await?.to_bytes();
            let body = String::from_utf8(bytes.to_vec())?;
            objects.lock().unwrap().insert(path, body.clone());
            Ok(json_response(200, body))
        }
        _ => {
            // Default 404 for unmatched requests
            Ok(json_response(404, not_found_json("resource", &path)))
        }
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a mock secret JSON response, values are given in plaintext
pub fn secret_json(namespace: &str, name: &str, data: &[(&str, &str)]) -> String {
    let data: serde_json::Map<String, serde_json::Value> = data
        .iter()
        .map(|(k, v)| (k.to_string(), STANDARD.encode(v.as_bytes()).into()))
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "resourceVersion": "1001",
            "labels": { "app.kubernetes.io/part-of": "argocd" }
        },
        "type": "Opaque",
        "data": data
    })
    .to_string()
}

/// Create a mock config map JSON response
pub fn config_map_json(namespace: &str, name: &str, data: &[(&str, &str)]) -> String {
    let data: serde_json::Map<String, serde_json::Value> = data
        .iter()
        .map(|(k, v)| (k.to_string(), (*v).into()))
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "resourceVersion": "2002"
        },
        "data": data
    })
    .to_string()
}

/// Create a mock deployment JSON response with the given rollout state
pub fn deployment_json(
    namespace: &str,
    name: &str,
    generation: i64,
    observed_generation: i64,
    updated_replicas: i32,
    available_replicas: i32,
) -> String {
    serde_json::json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "generation": generation
        },
        "spec": {
            "replicas": 1,
            "selector": { "matchLabels": { "app.kubernetes.io/name": name } },
            "template": {
                "metadata": { "labels": { "app.kubernetes.io/name": name } }
            }
        },
        "status": {
            "observedGeneration": observed_generation,
            "replicas": updated_replicas,
            "updatedReplicas": updated_replicas,
            "availableReplicas": available_replicas
        }
    })
    .to_string()
}

/// Create a Status failure response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}
