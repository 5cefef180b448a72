//! `CryptoService` implementation: converts protobuf messages, delegates to
//! the [`CryptoCatalog`](crate::CryptoCatalog) and maps errors onto gRPC
//! status codes.

use autometrics::autometrics;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Request;
use tonic::Response;
use tonic::Status;
use tracing::warn;

use crate::proto::crypto_service_server::CryptoService;
use crate::proto::CreateCryptoRequest;
use crate::proto::CryptoCurrency;
use crate::proto::DefaultResponse;
use crate::proto::DeleteCryptoRequest;
use crate::proto::EditCryptoRequest;
use crate::proto::FindCryptoRequest;
use crate::proto::ListCryptosRequest;
use crate::proto::ListCryptosResponse;
use crate::proto::VoteRequest;
use crate::proto::VoteResponse;
use crate::proto::WatchRequest;
use crate::CryptoServer;
use crate::VoteDirection;
use crate::VoteOutcome;
use crate::API_SLO;

impl CryptoServer {
    fn check_ready(
        &self,
        rpc: &str,
    ) -> std::result::Result<(), Status> {
        if !self.server_is_ready() {
            warn!("[rpc|{}] server is not ready!", rpc);
            return Err(Status::unavailable("Service is not ready"));
        }
        Ok(())
    }
}

fn vote_response(outcome: VoteOutcome) -> VoteResponse {
    VoteResponse {
        crypto: Some(outcome.crypto.to_proto()),
        message: outcome.message,
    }
}

#[tonic::async_trait]
impl CryptoService for CryptoServer {
    type WatchStream = ReceiverStream<std::result::Result<CryptoCurrency, Status>>;

    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    #[tracing::instrument(skip(self))]
    async fn create(
        &self,
        request: Request<CreateCryptoRequest>,
    ) -> std::result::Result<Response<CryptoCurrency>, Status> {
        self.check_ready("create")?;
        let req = request.into_inner();
        let record = self.catalog().create(&req.name, &req.asset_id, req.price_usd).await?;
        Ok(Response::new(record.to_proto()))
    }

    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    #[tracing::instrument(skip(self))]
    async fn edit(
        &self,
        request: Request<EditCryptoRequest>,
    ) -> std::result::Result<Response<CryptoCurrency>, Status> {
        self.check_ready("edit")?;
        let req = request.into_inner();
        let record = self
            .catalog()
            .edit(&req.id, &req.name, &req.asset_id, req.price_usd)
            .await?;
        Ok(Response::new(record.to_proto()))
    }

    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    #[tracing::instrument(skip(self))]
    async fn delete(
        &self,
        request: Request<DeleteCryptoRequest>,
    ) -> std::result::Result<Response<DefaultResponse>, Status> {
        self.check_ready("delete")?;
        let outcome = self.catalog().delete(&request.into_inner().id).await?;
        Ok(Response::new(DefaultResponse {
            id: outcome.id,
            message: outcome.message,
        }))
    }

    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    #[tracing::instrument(skip(self))]
    async fn find(
        &self,
        request: Request<FindCryptoRequest>,
    ) -> std::result::Result<Response<CryptoCurrency>, Status> {
        self.check_ready("find")?;
        let record = self.catalog().find(&request.into_inner().id).await?;
        Ok(Response::new(record.to_proto()))
    }

    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    #[tracing::instrument(skip(self))]
    async fn list_all(
        &self,
        request: Request<ListCryptosRequest>,
    ) -> std::result::Result<Response<ListCryptosResponse>, Status> {
        self.check_ready("list_all")?;
        let req = request.into_inner();
        let records = self.catalog().list_all(&req.field_sort, req.ascending).await?;
        Ok(Response::new(ListCryptosResponse {
            cryptos: records.iter().map(CryptoCurrency::from).collect(),
        }))
    }

    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    #[tracing::instrument(skip(self))]
    async fn upvote(
        &self,
        request: Request<VoteRequest>,
    ) -> std::result::Result<Response<VoteResponse>, Status> {
        self.check_ready("upvote")?;
        let outcome = self.catalog().vote(&request.into_inner().id, VoteDirection::Up).await?;
        Ok(Response::new(vote_response(outcome)))
    }

    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    #[tracing::instrument(skip(self))]
    async fn downvote(
        &self,
        request: Request<VoteRequest>,
    ) -> std::result::Result<Response<VoteResponse>, Status> {
        self.check_ready("downvote")?;
        let outcome = self
            .catalog()
            .vote(&request.into_inner().id, VoteDirection::Down)
            .await?;
        Ok(Response::new(vote_response(outcome)))
    }

    /// Subscribes before returning, then streams one snapshot per change of
    /// the requested record until the client disconnects or the server
    /// shuts down.
    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    #[tracing::instrument(skip(self))]
    async fn watch(
        &self,
        request: Request<WatchRequest>,
    ) -> std::result::Result<Response<Self::WatchStream>, Status> {
        self.check_ready("watch")?;
        let handler = self
            .catalog()
            .watch(&request.into_inner().id, self.watcher_token())?;

        let (response_sender, response_receiver) = mpsc::channel(self.settings().watch.watcher_buffer_size);
        tokio::spawn(handler.run(response_sender));

        Ok(Response::new(ReceiverStream::new(response_receiver)))
    }
}
