use tinylink_core::{ErrorKind, ServiceError, ShortenParams};
use tinylink_proto::v1 as proto;
use tinylink_proto::v1::link_service_server::LinkService;
use tonic::{Code, Request, Response, Status};
use tracing::trace;

use crate::state::AppState;

pub struct LinkGrpcServer {
    state: AppState,
}

impl LinkGrpcServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

pub fn code_for(kind: ErrorKind) -> Code {
    match kind {
        ErrorKind::InvalidInput => Code::InvalidArgument,
        ErrorKind::NotFound => Code::NotFound,
        ErrorKind::RateLimited => Code::ResourceExhausted,
        ErrorKind::GenerationExhausted | ErrorKind::Internal => Code::Internal,
        ErrorKind::Unavailable => Code::Unavailable,
        ErrorKind::Timeout => Code::DeadlineExceeded,
        ErrorKind::Cancelled => Code::Cancelled,
    }
}

fn into_status(error: ServiceError) -> Status {
    Status::new(code_for(error.kind()), error.to_string())
}

#[tonic::async_trait]
impl LinkService for LinkGrpcServer {
    async fn shorten(
        &self,
        request: Request<proto::ShortenRequest>,
    ) -> Result<Response<proto::ShortenResponse>, Status> {
        trace!(remote = ?request.remote_addr(), "grpc shorten");

        let params = ShortenParams::try_from(request.into_inner()).map_err(into_status)?;
        let link = self
            .state
            .shortener
            .shorten(params)
            .await
            .map_err(into_status)?;

        Ok(Response::new(link.into()))
    }

    async fn resolve(
        &self,
        request: Request<proto::ResolveRequest>,
    ) -> Result<Response<proto::ResolveResponse>, Status> {
        trace!(remote = ?request.remote_addr(), "grpc resolve");

        let code = request.into_inner().code;
        let url = self
            .state
            .redirector
            .resolve(&code)
            .await
            .map_err(into_status)?;

        Ok(Response::new(url.into()))
    }
}
