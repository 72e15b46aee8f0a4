use crate::{
    modules::error::{code::ErrorCode, RelayResult},
    raise_error,
};

/// Installs `ring` as the process-wide rustls crypto provider used by STARTTLS and
/// implicit TLS connections. Must run once, before the first SMTP connection.
pub fn install_crypto_provider() -> RelayResult<()> {
    rustls::crypto::CryptoProvider::install_default(rustls::crypto::ring::default_provider())
        .map_err(|_| {
            raise_error!(
                "failed to set crypto provider".into(),
                ErrorCode::InternalError
            )
        })
}
