use crate::modules::context::RelayContext;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::modules::smtp::relay::{DeliveryReport, SmtpRelay};
use crate::modules::smtp::request::EmailRequest;
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};
use serde::{Deserialize, Serialize};

pub struct SendMailApi;

#[derive(Clone, Debug, Deserialize, Serialize, Object)]
pub struct SendEmailResponse {
    /// Always `sent`.
    pub status: String,
    /// What the SMTP server accepted.
    pub response: DeliveryReport,
}

#[OpenApi(prefix_path = "/api", tag = "ApiTags::SendMail")]
impl SendMailApi {
    /// Sends an email through the configured SMTP server.
    ///
    /// The request is validated as a whole; a 422 response lists every invalid field.
    /// Overriding the sender may be restricted to a single domain, in which case a
    /// sender from any other domain is rejected with 400 before any connection is made.
    #[oai(path = "/send-email", method = "post", operation_id = "send_email")]
    async fn send_email(
        &self,
        /// A JSON payload describing the email to send
        request: Json<EmailRequest>,
        context: RelayContext,
    ) -> ApiResult<Json<SendEmailResponse>> {
        let draft = request.0.validate()?;
        let email = draft.compose(&context.smtp)?;
        let report = SmtpRelay::deliver(&context.smtp, &email).await?;
        Ok(Json(SendEmailResponse {
            status: "sent".into(),
            response: report,
        }))
    }
}
