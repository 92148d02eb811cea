//! Web handlers for the sightseeing API.

use actix_web::{
    get,
    web::{Data, ServiceConfig},
    HttpResponse,
};
use cadence::{CountedExt, Histogrammed, StatsdClient};
use charlie_settings::Settings;
use charlie_sightseeing::{
    normalize, NormalizeOptions, NormalizedTour, RawTourRecord, SearchError, SightseeingRequest,
    UpstreamPayload,
};
use serde::Serialize;

use crate::{
    errors::{HandlerError, HandlerErrorKind},
    extractors::SightseeingRequestWrapper,
    providers::SightseeingProviderRef,
};

/// Configure routes to use the sightseeing service.
pub fn configure(config: &mut ServiceConfig) {
    config.service(top_sight_seeing).service(all_sight_seeing);
}

/// The listings served by this module. They run the same search and
/// normalization, and differ only in post-processing.
#[derive(Debug, Clone, Copy)]
enum Listing {
    /// The best rated tours.
    Top,
    /// Every tour, in upstream order.
    All,
}

impl Listing {
    /// The post-processing configured for this listing.
    fn options(self, settings: &Settings) -> NormalizeOptions {
        match self {
            Self::Top => settings.sightseeing.top.into(),
            Self::All => settings.sightseeing.all.into(),
        }
    }
}

/// The best rated tours around the requested destination.
#[get("/get_sight_seeing")]
async fn top_sight_seeing(
    request: SightseeingRequestWrapper,
    provider: Data<SightseeingProviderRef>,
    metrics_client: Data<StatsdClient>,
    settings: Data<Settings>,
) -> Result<HttpResponse, HandlerError> {
    sight_seeing(Listing::Top, request, &provider, &metrics_client, &settings).await
}

/// Every tour around the requested destination.
#[get("/get_all_sight_seeing")]
async fn all_sight_seeing(
    request: SightseeingRequestWrapper,
    provider: Data<SightseeingProviderRef>,
    metrics_client: Data<StatsdClient>,
    settings: Data<Settings>,
) -> Result<HttpResponse, HandlerError> {
    sight_seeing(Listing::All, request, &provider, &metrics_client, &settings).await
}

/// Search the provider and answer with the normalized tours for `listing`.
#[tracing::instrument(skip(sightseeing_request, provider, metrics_client, settings))]
async fn sight_seeing(
    listing: Listing,
    SightseeingRequestWrapper(sightseeing_request): SightseeingRequestWrapper,
    provider: &SightseeingProviderRef,
    metrics_client: &StatsdClient,
    settings: &Settings,
) -> Result<HttpResponse, HandlerError> {
    safe_log_request(settings.log_full_request, listing, &sightseeing_request);

    let records = match provider.search(&sightseeing_request).await {
        Ok(UpstreamPayload::Tours(records)) => records,
        Ok(UpstreamPayload::Unrecognized(body)) => {
            tracing::warn!(
                r#type = "web.sightseeing.no-data",
                provider = %provider.name(),
                "Upstream response did not contain a list of tours"
            );
            metrics_client.incr("sightseeing.no-data").ok();
            return Err(HandlerErrorKind::NoData(body).into());
        }
        Err(error) => {
            match &error {
                SearchError::Upstream { status, body } => tracing::error!(
                    r#type = "web.sightseeing.error",
                    %error,
                    status = *status,
                    %body,
                    "Upstream rejected the sightseeing request"
                ),
                SearchError::Network(_) => tracing::error!(
                    r#type = "web.sightseeing.error",
                    %error,
                    "Error fetching sightseeing details"
                ),
            }
            metrics_client.incr("sightseeing.upstream-error").ok();
            return Err(error.into());
        }
    };

    let tours = normalize(
        records.into_iter().map(RawTourRecord::from),
        listing.options(settings),
    );

    tracing::debug!(
        r#type = "web.sightseeing.provided-count",
        tour_count = tours.len(),
        "Providing tours"
    );
    metrics_client
        .histogram("sightseeing.tours-per", tours.len() as u64)
        .ok();

    Ok(HttpResponse::Ok().json(SightseeingResponse {
        agent: &settings.agent.name,
        extracted_info: &sightseeing_request.destination,
        sight_seeing: tours,
    }))
}

/// The response the API generates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SightseeingResponse<'a> {
    /// The name of the agent answering.
    agent: &'a str,
    /// The destination the tours were searched for.
    extracted_info: &'a str,
    /// The normalized tours.
    sight_seeing: Vec<NormalizedTour>,
}

/// Log a sightseeing request, respecting the log_full_request setting passed.
/// Destinations are free text typed by users, so they are only logged when
/// explicitly enabled.
fn safe_log_request(log_full_request: bool, listing: Listing, request: &SightseeingRequest) {
    let destination = if log_full_request {
        request.destination.as_str()
    } else {
        ""
    };

    tracing::info!(
        r#type = "web.sightseeing.request",
        sensitive = true,
        ?listing,
        %destination,
        "handling sightseeing request"
    );
}

#[cfg(test)]
mod tests {
    use super::configure;
    use crate::providers::SightseeingProviderRef;
    use actix_web::{
        http::StatusCode,
        test,
        web::{self, Data},
        App,
    };
    use async_trait::async_trait;
    use cadence::{NopMetricSink, StatsdClient};
    use charlie_settings::Settings;
    use charlie_sightseeing::{
        SearchError, SightseeingProvider, SightseeingRequest, UpstreamPayload,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    /// A provider that always answers the same way.
    enum StubProvider {
        Body(Value),
        Rejected(u16, Value),
    }

    #[async_trait]
    impl SightseeingProvider for StubProvider {
        fn name(&self) -> String {
            "StubProvider".to_owned()
        }

        async fn search(
            &self,
            _request: &SightseeingRequest,
        ) -> Result<UpstreamPayload, SearchError> {
            match self {
                Self::Body(body) => Ok(UpstreamPayload::from_body(body.clone())),
                Self::Rejected(status, body) => Err(SearchError::Upstream {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }

    fn rated_tours(ratings: &[f64]) -> Value {
        let data: Vec<Value> = ratings
            .iter()
            .map(|rating| json!({"title": format!("rated {}", rating), "rating": rating}))
            .collect();
        json!({ "status": true, "data": data })
    }

    async fn call(provider: StubProvider, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(Settings::load_for_tests(|_| ())))
                .app_data(Data::new(StatsdClient::from_sink("test", NopMetricSink)))
                .app_data(Data::new(SightseeingProviderRef::new(provider)))
                .service(web::scope("v1").configure(configure)),
        )
        .await;
        let response = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }

    #[actix_rt::test]
    async fn top_listing_is_ranked_and_truncated() {
        let (status, body) = call(
            StubProvider::Body(rated_tours(&[3.0, 5.0, 1.0, 4.0, 2.0, 4.5])),
            "/v1/get_sight_seeing?destination=Paris",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["agent"], json!("Charlie"));
        assert_eq!(body["extractedInfo"], json!("Paris"));
        let ratings: Vec<Value> = body["sightSeeing"]
            .as_array()
            .expect("tours should be a list")
            .iter()
            .map(|tour| tour["rating"].clone())
            .collect();
        assert_eq!(ratings, vec![json!(5.0), json!(4.5), json!(4.0), json!(3.0)]);
    }

    #[actix_rt::test]
    async fn all_listing_keeps_order_and_count() {
        let (status, body) = call(
            StubProvider::Body(rated_tours(&[3.0, 5.0, 1.0, 4.0, 2.0, 4.5])),
            "/v1/get_all_sight_seeing?destination=Paris",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let titles: Vec<Value> = body["sightSeeing"]
            .as_array()
            .expect("tours should be a list")
            .iter()
            .map(|tour| tour["title"].clone())
            .collect();
        assert_eq!(
            titles,
            vec![
                json!("rated 3"),
                json!("rated 5"),
                json!("rated 1"),
                json!("rated 4"),
                json!("rated 2"),
                json!("rated 4.5")
            ]
        );
    }

    #[actix_rt::test]
    async fn empty_data_list_is_a_success() {
        let (status, body) = call(
            StubProvider::Body(json!({"data": []})),
            "/v1/get_sight_seeing?destination=Nowhere",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sightSeeing"], json!([]));
    }

    #[actix_rt::test]
    async fn missing_destination_is_bad_request() {
        let (status, body) = call(
            StubProvider::Body(json!({"data": []})),
            "/v1/get_sight_seeing",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Destination is required"}));
    }

    #[actix_rt::test]
    async fn missing_data_list_is_not_found() {
        let (status, body) = call(
            StubProvider::Body(json!({"status": false, "message": "nothing here"})),
            "/v1/get_all_sight_seeing?destination=Atlantis",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({
                "error": "No sightseeing data found",
                "apiResponse": {"status": false, "message": "nothing here"},
            })
        );
    }

    #[actix_rt::test]
    async fn upstream_rejection_is_server_error() {
        let (status, body) = call(
            StubProvider::Rejected(401, json!({"message": "Invalid API key."})),
            "/v1/get_sight_seeing?destination=Paris",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "error": "Failed to fetch sightSeeing details",
                "details": "Request failed with status code 401",
                "apiError": {"message": "Invalid API key."},
            })
        );
    }
}
