use super::greet::{greeter_server::Greeter, GreetReply, GreetRequest};
use crate::core::greeting::greeting_service;
use tonic::{Request, Response, Status};

#[derive(Debug, Default)]
pub struct GreeterService {}

#[tonic::async_trait]
impl Greeter for GreeterService {
    async fn greet(&self, request: Request<GreetRequest>) -> Result<Response<GreetReply>, Status> {
        let request = request.into_inner();

        tracing::trace!("gRPC in: {}", request.name);
        let message = greeting_service::greet(&request.name);
        tracing::trace!("gRPC out: {}", message);

        Ok(Response::new(GreetReply { message }))
    }
}
