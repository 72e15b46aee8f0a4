use mimalloc::MiMalloc;
use modules::{
    common::rustls::install_crypto_provider, error::RelayResult, logger, rest::start_http_server,
    settings::cli::Settings,
};
use tracing::info;

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> RelayResult<()> {
    let settings = Settings::load();
    if let Err(error) = logger::initialize_logging(&settings) {
        eprintln!("{}", error);
        return Err(error);
    }
    info!("Starting draftmailer");
    info!("Version:  {}", draftmailer_version!());
    info!("Git:      [{}]", env!("GIT_HASH"));

    install_crypto_provider()?;
    start_http_server(&settings).await
}
