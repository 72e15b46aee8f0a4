use crate::modules::error::code::ErrorCode;
use crate::modules::error::RelayResult;
use crate::raise_error;
use mail_send::smtp::message::IntoMessage;
use mail_send::SmtpClient;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

pub enum RelaySmtpClient {
    Plain(SmtpClient<TcpStream>),
    Tls(SmtpClient<TlsStream<TcpStream>>),
}

pub(crate) trait Sender {
    async fn send_email<'x>(&mut self, message: impl IntoMessage<'x>) -> RelayResult<()>;
    async fn quit(self) -> RelayResult<()>;
}

impl Sender for RelaySmtpClient {
    async fn send_email<'x>(&mut self, message: impl IntoMessage<'x>) -> RelayResult<()> {
        let result = match self {
            RelaySmtpClient::Plain(smtp_client) => smtp_client.send(message).await,
            RelaySmtpClient::Tls(smtp_client) => smtp_client.send(message).await,
        };
        result.map_err(|e| {
            raise_error!(
                format!("Failed to send email: {}", e),
                ErrorCode::SmtpCommandFailed
            )
        })
    }

    async fn quit(self) -> RelayResult<()> {
        let result = match self {
            RelaySmtpClient::Plain(smtp_client) => smtp_client.quit().await,
            RelaySmtpClient::Tls(smtp_client) => smtp_client.quit().await,
        };
        result.map_err(|e| raise_error!(format!("{}", e), ErrorCode::SmtpCommandFailed))
    }
}
