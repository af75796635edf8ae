//! containerd 백엔드
//!
//! containerd 소켓에 gRPC 채널을 열고 `Containers.Get`으로 컨테이너를
//! 조회합니다. 응답의 OCI 런타임 스펙(UTF-8 JSON)에서 `process.env`
//! 목록을 읽습니다. kubernetes 노드에서는 네임스페이스가 `k8s.io`입니다.

use std::collections::HashMap;

use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tonic::metadata::MetadataValue;
use tonic::transport::{Channel, Endpoint, Uri};
use tower::service_fn;

use crate::env::parse_env_list;
use crate::error::RuntimeError;
use crate::proto;
use crate::resolver::{EnvResolver, validate_container_id};

/// containerd namespace 메타데이터 헤더 키
const NAMESPACE_HEADER: &str = "containerd-namespace";

/// `Containers.Get` unary 호출 경로
const GET_CONTAINER_PATH: &str = "/containerd.services.containers.v1.Containers/Get";

/// containerd gRPC 기반 환경 resolver
///
/// 채널은 시작 시 한 번 만들어져 프로세스 수명 동안 재사용됩니다.
/// `Channel`은 내부적으로 multiplexing되므로 호출마다 clone해도
/// 새 연결을 만들지 않습니다.
pub struct ContainerdEnvResolver {
    channel: Channel,
    namespace: String,
}

impl ContainerdEnvResolver {
    /// containerd 소켓을 향한 lazy 채널을 만듭니다.
    ///
    /// gRPC는 URI를 요구하지만 Unix 소켓 연결에서는 사용되지 않으므로
    /// 더미 주소를 전달하고 connector가 실제 소켓을 엽니다. 연결은 첫
    /// 호출 시점에 수립되며, 실패는 호출 단위 `RuntimeError::Rpc`로
    /// 나타납니다 — 소켓이 내려가 있어도 시작은 성공합니다.
    pub fn connect_lazy(socket_path: &str, namespace: &str) -> Self {
        let socket = socket_path.to_owned();
        let channel = Endpoint::from_static("http://[::1]:50051").connect_with_connector_lazy(
            service_fn(move |_: Uri| {
                let path = socket.clone();
                async move {
                    Ok::<_, std::io::Error>(TokioIo::new(UnixStream::connect(path).await?))
                }
            }),
        );

        Self {
            channel,
            namespace: namespace.to_owned(),
        }
    }

    /// id로 컨테이너 레코드를 조회합니다.
    async fn get_container(&self, container_id: &str) -> Result<proto::Container, RuntimeError> {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| RuntimeError::Rpc(format!("containerd channel not ready: {e}")))?;

        let mut request = tonic::Request::new(proto::GetContainerRequest {
            id: container_id.to_owned(),
        });
        let namespace = MetadataValue::try_from(self.namespace.as_str()).map_err(|e| {
            RuntimeError::Rpc(format!(
                "invalid containerd namespace '{}': {e}",
                self.namespace
            ))
        })?;
        request.metadata_mut().insert(NAMESPACE_HEADER, namespace);

        let codec: tonic::codec::ProstCodec<
            proto::GetContainerRequest,
            proto::GetContainerResponse,
        > = tonic::codec::ProstCodec::default();
        let path = http::uri::PathAndQuery::from_static(GET_CONTAINER_PATH);

        let response = grpc
            .unary(request, path, codec)
            .await
            .map_err(|status| {
                RuntimeError::Rpc(format!("containerd Get('{container_id}') failed: {status}"))
            })?;

        response.into_inner().container.ok_or_else(|| {
            RuntimeError::SpecDecode(format!(
                "containerd returned no container record for '{container_id}'"
            ))
        })
    }
}

/// OCI 런타임 스펙 JSON에서 `process.env` 목록을 추출합니다.
///
/// `process` 또는 `env` 섹션이 없으면 빈 목록입니다 — 에러가 아닙니다.
fn env_list_from_spec(spec_json: &[u8]) -> Result<Vec<String>, RuntimeError> {
    let doc: serde_json::Value = serde_json::from_slice(spec_json)
        .map_err(|e| RuntimeError::SpecDecode(format!("container spec is not valid JSON: {e}")))?;

    Ok(doc
        .get("process")
        .and_then(|process| process.get("env"))
        .and_then(|env| env.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default())
}

impl EnvResolver for ContainerdEnvResolver {
    fn backend_name(&self) -> &'static str {
        "containerd"
    }

    async fn container_env(
        &self,
        container_id: &str,
    ) -> Result<HashMap<String, String>, RuntimeError> {
        validate_container_id(container_id)?;

        let container = self.get_container(container_id).await?;
        let spec = container.spec.ok_or_else(|| {
            RuntimeError::SpecDecode(format!("container '{container_id}' has no spec"))
        })?;

        let env_list = env_list_from_spec(&spec.value)?;
        let env = parse_env_list(env_list);
        tracing::debug!(
            container_id,
            vars = env.len(),
            "resolved container environment via containerd"
        );
        Ok(env)
    }

    async fn ping(&self) -> Result<(), RuntimeError> {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| RuntimeError::Connection(format!("containerd ping failed: {e}")))?;
        Ok(())
    }
}
