use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::auth_service::{self, Claims};

/// Verifies the bearer token and stores the claims in the request
/// extensions for the wrapped handlers.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Get Authorization header
        let auth_header = req.headers().get("Authorization");

        match auth_header {
            Some(header_value) => {
                if let Ok(header_str) = header_value.to_str() {
                    if let Some(token) = header_str.strip_prefix("Bearer ") {
                        match auth_service::verify_token(token) {
                            Ok(claims) => {
                                req.extensions_mut().insert(claims);

                                let fut = self.service.call(req);
                                return Box::pin(async move {
                                    let res = fut.await?;
                                    Ok(res)
                                });
                            }
                            Err(e) => {
                                log::warn!("❌ Rejected token: {}", e);
                                return Box::pin(async move {
                                    Err(actix_web::error::ErrorUnauthorized(
                                        "Invalid or expired token",
                                    ))
                                });
                            }
                        }
                    }
                }

                Box::pin(async move {
                    Err(actix_web::error::ErrorUnauthorized("Invalid token format"))
                })
            }
            None => Box::pin(async move {
                Err(actix_web::error::ErrorUnauthorized(
                    "Missing authorization token",
                ))
            }),
        }
    }
}

/// Claims stored by the middleware for the current request. `None` only
/// when a handler is reached outside an AuthMiddleware scope.
pub fn authenticated_claims(req: &HttpRequest) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}
