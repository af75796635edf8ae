//! containerd containers v1 서비스의 메시지 타입
//!
//! `containerd/api/services/containers/v1/containers.proto`에서 이 클라이언트가
//! 실제로 읽는 필드만 옮긴 수동 정의입니다. protobuf는 정의되지 않은 필드를
//! 디코딩 시 건너뛰므로, 태그 번호만 원본 스키마와 일치하면 됩니다.

/// `Containers.Get` 요청
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetContainerRequest {
    /// 컨테이너 id
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
}

/// `Containers.Get` 응답
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetContainerResponse {
    /// 조회된 컨테이너
    #[prost(message, optional, tag = "1")]
    pub container: ::core::option::Option<Container>,
}

/// 컨테이너 레코드 (사용하는 필드만 정의)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Container {
    /// 컨테이너 id
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,

    /// 이미지 참조
    #[prost(string, tag = "3")]
    pub image: ::prost::alloc::string::String,

    /// OCI 런타임 스펙 — `value`는 UTF-8 JSON 문서
    #[prost(message, optional, tag = "5")]
    pub spec: ::core::option::Option<::prost_types::Any>,
}
