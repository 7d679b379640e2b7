//! Messages and generated stubs of the `greet.Greeter` service.

/// The request to `Greet`.
#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct GreetRequest {
    /// Who to greet.
    #[prost(string, tag = "1")]
    pub name: String,
}

/// The response to `Greet`.
#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct GreetReply {
    /// The greeting.
    #[prost(string, tag = "1")]
    pub message: String,
}

include!(concat!(env!("OUT_DIR"), "/greet.Greeter.rs"));
