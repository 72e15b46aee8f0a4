use crate::modules::compose::gmail::{
    build_gmail_compose_url, GmailComposeRequest, GmailComposeResponse,
};
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

pub struct ComposeApi;

#[OpenApi(prefix_path = "/api", tag = "ApiTags::Compose")]
impl ComposeApi {
    /// Builds a Gmail compose link.
    ///
    /// The HTML body is reduced to plain text. Attachments cannot travel in a link, so
    /// their names are appended to the body as a note. At least one field must be set.
    #[oai(
        path = "/gmail-compose-url",
        method = "post",
        operation_id = "gmail_compose_url"
    )]
    async fn gmail_compose_url(
        &self,
        /// Recipients, subject, HTML body and attachments, all optional
        request: Json<GmailComposeRequest>,
    ) -> ApiResult<Json<GmailComposeResponse>> {
        let url = build_gmail_compose_url(&request.0)?;
        Ok(Json(GmailComposeResponse { url }))
    }
}
