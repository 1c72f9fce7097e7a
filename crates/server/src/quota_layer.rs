//! Quota classification middleware for HTTP requests.

use std::{
    borrow::Cow,
    fmt::Display,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::body::Body;
use config::{ClientIpConfig, QuotaConfig};
use context::QuotaDecision;
use fastrace::{Span, future::FutureExt, prelude::SpanContext};
use http::{HeaderMap, HeaderName, Request, Response};
use quota::{ClassificationRequest, Classifier};
use tower::Layer;

use crate::{client_ip::extract_client_ip, error::Error, headers};

/// Classifies every request and attaches the [`QuotaDecision`] to it.
///
/// The decision is available to inner services as a request extension and as
/// `x-quota-*` / `x-spike-arrest-*` request headers.
#[derive(Clone)]
pub struct QuotaLayer(Arc<QuotaLayerInner>);

struct QuotaLayerInner {
    classifier: Classifier,
    client_ip_config: ClientIpConfig,
    client_name_header: HeaderName,
    client_type_header: HeaderName,
}

impl QuotaLayer {
    pub fn new(config: &QuotaConfig, client_ip_config: ClientIpConfig) -> crate::Result<Self> {
        let client_name_header = header_name(&config.client_name_header)?;
        let client_type_header = header_name(&config.client_type_header)?;

        Ok(Self(Arc::new(QuotaLayerInner {
            classifier: Classifier::new(config),
            client_ip_config,
            client_name_header,
            client_type_header,
        })))
    }

    pub fn client_name_header(&self) -> &HeaderName {
        &self.0.client_name_header
    }
}

fn header_name(name: &str) -> crate::Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|source| Error::InvalidHeader {
        name: name.to_owned(),
        source,
    })
}

impl QuotaLayerInner {
    fn classify<B>(&self, req: &Request<B>) -> QuotaDecision {
        let ip = extract_client_ip(&self.client_ip_config, req);

        let client_name = header_str(req.headers(), &self.client_name_header);
        let client_type = header_str(req.headers(), &self.client_type_header);

        let request = ClassificationRequest::new(ip)
            .client_name(client_name.as_deref())
            .client_type(client_type.as_deref());

        self.classifier.classify(&request)
    }
}

/// Header values are read as UTF-8, so names like `ruter-reiseplanlegger-ø` are
/// kept as sent. Bytes that are not UTF-8 become U+FFFD instead of dropping the name.
fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<Cow<'a, str>> {
    headers.get(name).map(|value| String::from_utf8_lossy(value.as_bytes()))
}

impl<Service> Layer<Service> for QuotaLayer
where
    Service: Send + Clone,
{
    type Service = QuotaService<Service>;

    fn layer(&self, next: Service) -> Self::Service {
        QuotaService {
            next,
            layer: self.0.clone(),
        }
    }
}

#[derive(Clone)]
pub struct QuotaService<Service> {
    next: Service,
    layer: Arc<QuotaLayerInner>,
}

impl<Service, ReqBody> tower::Service<Request<ReqBody>> for QuotaService<Service>
where
    Service: tower::Service<Request<ReqBody>, Response = Response<Body>> + Send + Clone + 'static,
    Service::Future: Send,
    Service::Error: Display + 'static,
    ReqBody: http_body::Body + Send + 'static,
{
    type Response = http::Response<Body>;
    type Error = Service::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response<Body>, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.next.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let mut next = self.next.clone();

        let span = Span::root(format!("quota {}", req.uri().path()), SpanContext::random());
        let decision = {
            let _guard = span.set_local_parent();
            self.layer.classify(&req)
        };

        span.add_property(|| ("quota.tier", decision.tier.clone()));
        span.add_property(|| ("quota.query_class", decision.query_class.to_string()));
        span.add_property(|| ("quota.client.identifier", decision.rate_key.to_string()));

        headers::insert_decision(req.headers_mut(), &decision, &self.layer.client_name_header);
        req.extensions_mut().insert(decision);

        Box::pin(async move { next.call(req).await }.in_span(span))
    }
}
