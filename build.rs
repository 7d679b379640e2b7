fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // The greeter stubs are generated from a manual service definition with
    // prost message types, so building does not depend on a local `protoc`.
    let greeter = tonic_build::manual::Service::builder()
        .name("Greeter")
        .package("greet")
        .method(
            tonic_build::manual::Method::builder()
                .name("greet")
                .route_name("Greet")
                .input_type("crate::api::grpc::greet::GreetRequest")
                .output_type("crate::api::grpc::greet::GreetReply")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    tonic_build::manual::Builder::new().compile(&[greeter]);
}
