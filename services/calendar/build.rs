fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_file = "proto/calendar.proto";
    println!("cargo:rerun-if-changed={proto_file}");

    let mut config = prost_build::Config::new();
    config.protoc_executable(protoc_bin_vendored::protoc_bin_path()?);

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos_with_config(config, &[proto_file], &["proto"])?;
    Ok(())
}
