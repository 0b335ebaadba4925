//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! The deal routes are mounted under the `/dealtracker` scope (see [`crate::server`]). Every handler is generic over
//! the [`DealStore`] backing the [`DealFlowApi`], so that the endpoint tests can swap in a mock store.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any I/O, including every database call, must be awaited rather
//! than blocked on.
use actix_web::{error::JsonPayloadError, get, web, HttpRequest, HttpResponse, Responder};
use deal_tracker_engine::{db_types::DealSubmission, DealFlowApi, DealStore};
use log::*;

use crate::errors::ServerError;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// Malformed deal payloads are reported as a `400` with the same JSON error body as every other server error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Could not deserialize deal. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

//----------------------------------------------   Queries  ----------------------------------------------------
route!(get_all => Get "/getAll" impl DealStore);
/// Every stored deal, in no particular order.
pub async fn get_all<B: DealStore>(api: web::Data<DealFlowApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all deals");
    let deals = api.all_deals().await.map_err(|e| {
        debug!("💻️ Could not fetch deals. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(deals))
}

route!(get_by_reference => Get "/get/{deal_reference}" impl DealStore);
/// Fetch a deal by its business reference. If no deal carries the reference, the body is `null`.
pub async fn get_by_reference<B: DealStore>(
    path: web::Path<String>,
    api: web::Data<DealFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let deal_reference = path.into_inner();
    debug!("💻️ GET deal {deal_reference}");
    let deal = api.deal_by_reference(&deal_reference).await.map_err(|e| {
        debug!("💻️ Could not fetch deal {deal_reference}. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(deal))
}

route!(deals_waiting => Get "/getDealsWaiting" impl DealStore);
pub async fn deals_waiting<B: DealStore>(api: web::Data<DealFlowApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET deals waiting");
    let deals = api.deals_waiting().await.map_err(|e| {
        debug!("💻️ Could not fetch waiting deals. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(deals))
}

route!(deals_in_processing => Get "/getDealsInProcessing" impl DealStore);
pub async fn deals_in_processing<B: DealStore>(api: web::Data<DealFlowApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET deals in processing");
    let deals = api.deals_in_processing().await.map_err(|e| {
        debug!("💻️ Could not fetch deals in processing. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(deals))
}

//----------------------------------------------   Commands  ----------------------------------------------------
route!(process_deal => Post "/process" impl DealStore);
/// The upstream system submits deals to `/process` every time one of its timestamps changes.
///
/// The deal reconciler decides whether the submission creates, updates or removes a record. The caller is not told
/// which: a successful call always returns `204 No Content`, including for submissions that refer to an id the
/// tracker does not know.
pub async fn process_deal<B: DealStore>(
    body: web::Json<DealSubmission>,
    api: web::Data<DealFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let submission = body.into_inner();
    debug!("💻️ POST process deal {}", submission.deal_reference);
    let outcome = api.process(submission).await.map_err(|e| {
        debug!("💻️ Could not process deal. {e}");
        e
    })?;
    trace!("💻️ Deal processed: {outcome}");
    Ok(HttpResponse::NoContent().finish())
}

route!(delete_by_reference => Delete "/delete/{deal_reference}" impl DealStore);
/// Remove the first deal carrying the given reference. Deleting an unknown reference is not an error.
pub async fn delete_by_reference<B: DealStore>(
    path: web::Path<String>,
    api: web::Data<DealFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let deal_reference = path.into_inner();
    debug!("💻️ DELETE deal {deal_reference}");
    let deleted = api.delete_by_reference(&deal_reference).await.map_err(|e| {
        debug!("💻️ Could not delete deal {deal_reference}. {e}");
        e
    })?;
    if deleted.is_none() {
        debug!("💻️ There was no deal {deal_reference} to delete");
    }
    Ok(HttpResponse::NoContent().finish())
}
