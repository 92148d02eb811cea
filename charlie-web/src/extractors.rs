//! Types to extract sightseeing requests from HTTP requests.

use actix_web::{
    dev::Payload,
    web::{Json, Query},
    FromRequest, HttpRequest,
};
use charlie_sightseeing::SightseeingRequest;
use futures_util::future::{FutureExt, LocalBoxFuture};
use serde::Deserialize;

use crate::errors::{HandlerError, HandlerErrorKind};

/// An extractor for a [`charlie_sightseeing::SightseeingRequest`].
///
/// The destination is read from the `destination` query parameter, or failing
/// that from the `destination` field of a JSON body. An empty destination
/// counts as missing.
#[derive(Debug)]
pub struct SightseeingRequestWrapper(pub SightseeingRequest);

/// Where the destination may appear, in the query string or a JSON body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DestinationParams {
    /// Free text naming the destination.
    destination: Option<String>,
}

impl DestinationParams {
    /// The destination, unless it is missing or empty.
    fn into_destination(self) -> Option<String> {
        self.destination.filter(|destination| !destination.is_empty())
    }
}

impl FromRequest for SightseeingRequestWrapper {
    type Error = HandlerError;

    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let from_query = Query::<DestinationParams>::from_query(req.query_string())
            .ok()
            .and_then(|Query(params)| params.into_destination());
        let body = Json::<DestinationParams>::from_request(req, payload);

        async move {
            let destination = match from_query {
                Some(destination) => Some(destination),
                // Requests without a JSON body fail to extract, which is the
                // same as not naming a destination.
                None => body
                    .await
                    .ok()
                    .and_then(|Json(params)| params.into_destination()),
            };

            destination
                .map(|destination| Self(SightseeingRequest::new(destination)))
                .ok_or_else(|| HandlerErrorKind::MissingDestination.into())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::SightseeingRequestWrapper;
    use actix_web::{test::TestRequest, FromRequest};
    use charlie_sightseeing::SightseeingRequest;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[actix_rt::test]
    async fn destination_from_query() {
        let (req, mut payload) = TestRequest::get()
            .uri("/v1/get_sight_seeing?destination=Lisbon")
            .to_http_parts();
        let SightseeingRequestWrapper(request) =
            SightseeingRequestWrapper::from_request(&req, &mut payload)
                .await
                .expect("destination should be found");
        assert_eq!(request, SightseeingRequest::new("Lisbon"));
    }

    #[actix_rt::test]
    async fn destination_from_json_body() {
        let (req, mut payload) = TestRequest::get()
            .uri("/v1/get_sight_seeing")
            .set_json(json!({"destination": "Kyoto"}))
            .to_http_parts();
        let SightseeingRequestWrapper(request) =
            SightseeingRequestWrapper::from_request(&req, &mut payload)
                .await
                .expect("destination should be found");
        assert_eq!(request, SightseeingRequest::new("Kyoto"));
    }

    #[actix_rt::test]
    async fn query_wins_over_body() {
        let (req, mut payload) = TestRequest::get()
            .uri("/v1/get_sight_seeing?destination=Oslo")
            .set_json(json!({"destination": "Bergen"}))
            .to_http_parts();
        let SightseeingRequestWrapper(request) =
            SightseeingRequestWrapper::from_request(&req, &mut payload)
                .await
                .expect("destination should be found");
        assert_eq!(request.destination, "Oslo");
    }

    #[actix_rt::test]
    async fn empty_query_falls_back_to_body() {
        let (req, mut payload) = TestRequest::get()
            .uri("/v1/get_sight_seeing?destination=")
            .set_json(json!({"destination": "Bergen"}))
            .to_http_parts();
        let SightseeingRequestWrapper(request) =
            SightseeingRequestWrapper::from_request(&req, &mut payload)
                .await
                .expect("destination should be found");
        assert_eq!(request.destination, "Bergen");
    }

    #[actix_rt::test]
    async fn missing_destination_is_rejected() {
        for uri in ["/v1/get_sight_seeing", "/v1/get_sight_seeing?destination="] {
            let (req, mut payload) = TestRequest::get().uri(uri).to_http_parts();
            let error = SightseeingRequestWrapper::from_request(&req, &mut payload)
                .await
                .expect_err("destination should be missing");
            assert_eq!(error.to_string(), "Destination is required");
        }
    }
}
