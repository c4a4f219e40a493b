use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header};
use futures::future::{Ready, ready};
use std::convert::Infallible;

use crate::auth::auth::AuthUser;
use crate::model::audit::RequestContext;

impl RequestContext {
    pub fn from_http(req: &HttpRequest) -> Self {
        let actor = req
            .extensions()
            .get::<AuthUser>()
            .and_then(|u| u.employee_number.clone());

        let ip_address = req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_string);

        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Self {
            actor,
            ip_address,
            user_agent,
        }
    }
}

impl FromRequest for RequestContext {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(RequestContext::from_http(req)))
    }
}
