//! Request/response middleware
//!
//! Request middleware runs in registration order on the fully built request,
//! after default headers are applied. Response middleware runs in
//! registration order on the outcome of the call; non-success statuses have
//! already been turned into a [`ClientError`] at that point, so a middleware
//! reacting to 401 looks for [`ClientError::AuthenticationFailed`].

use super::error::ClientError;
use reqwest::{Request, Response};
use std::sync::Arc;

/// Hook applied to every outgoing request
pub trait RequestMiddleware: Send + Sync {
    fn on_request(&self, request: Request) -> Result<Request, ClientError>;
}

/// Hook applied to every response or failure
pub trait ResponseMiddleware: Send + Sync {
    fn on_response(
        &self,
        outcome: Result<Response, ClientError>,
    ) -> Result<Response, ClientError>;
}

impl<F> RequestMiddleware for F
where
    F: Fn(Request) -> Result<Request, ClientError> + Send + Sync,
{
    fn on_request(&self, request: Request) -> Result<Request, ClientError> {
        self(request)
    }
}

impl<F> ResponseMiddleware for F
where
    F: Fn(Result<Response, ClientError>) -> Result<Response, ClientError> + Send + Sync,
{
    fn on_response(
        &self,
        outcome: Result<Response, ClientError>,
    ) -> Result<Response, ClientError> {
        self(outcome)
    }
}

/// Ordered middleware stages of a client
#[derive(Clone, Default)]
pub(crate) struct MiddlewareChain {
    request: Vec<Arc<dyn RequestMiddleware>>,
    response: Vec<Arc<dyn ResponseMiddleware>>,
}

impl MiddlewareChain {
    pub(crate) fn push_request(&mut self, middleware: Arc<dyn RequestMiddleware>) {
        self.request.push(middleware);
    }

    pub(crate) fn push_response(&mut self, middleware: Arc<dyn ResponseMiddleware>) {
        self.response.push(middleware);
    }

    pub(crate) fn apply_request(&self, request: Request) -> Result<Request, ClientError> {
        self.request
            .iter()
            .try_fold(request, |request, middleware| middleware.on_request(request))
    }

    pub(crate) fn apply_response(
        &self,
        outcome: Result<Response, ClientError>,
    ) -> Result<Response, ClientError> {
        self.response
            .iter()
            .fold(outcome, |outcome, middleware| middleware.on_response(outcome))
    }

    pub(crate) fn len(&self) -> (usize, usize) {
        (self.request.len(), self.response.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use reqwest::header::HeaderValue;

    fn request() -> Request {
        Request::new(Method::GET, "http://localhost/api/me".parse().unwrap())
    }

    #[test]
    fn test_request_stages_run_in_order() {
        let mut chain = MiddlewareChain::default();
        chain.push_request(Arc::new(|mut request: Request| -> Result<Request, ClientError> {
            request
                .headers_mut()
                .insert("x-stage", HeaderValue::from_static("first"));
            Ok(request)
        }));
        chain.push_request(Arc::new(|mut request: Request| -> Result<Request, ClientError> {
            request
                .headers_mut()
                .insert("x-stage", HeaderValue::from_static("second"));
            Ok(request)
        }));

        let request = chain.apply_request(request()).unwrap();
        assert_eq!(request.headers()["x-stage"], "second");
        assert_eq!(chain.len(), (2, 0));
    }

    #[test]
    fn test_failing_request_stage_stops_the_chain() {
        let mut chain = MiddlewareChain::default();
        chain.push_request(Arc::new(|_: Request| -> Result<Request, ClientError> {
            Err(ClientError::Configuration("nope".to_string()))
        }));
        chain.push_request(Arc::new(|_: Request| -> Result<Request, ClientError> {
            panic!("second stage must not run")
        }));

        assert!(matches!(
            chain.apply_request(request()),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_response_stages_see_errors() {
        let mut chain = MiddlewareChain::default();
        chain.push_response(Arc::new(
            |outcome: Result<Response, ClientError>| -> Result<Response, ClientError> {
                outcome.map_err(|e| match e {
                    ClientError::NotFound(m) => ClientError::BadRequest(m),
                    other => other,
                })
            },
        ));

        let outcome = chain.apply_response(Err(ClientError::NotFound("x".to_string())));
        assert!(matches!(outcome, Err(ClientError::BadRequest(_))));
    }
}
