//! Minimal standalone server answering every request with a greeting.
//!
//! Shares the `PORT` convention with the main binary and is only useful for
//! checking that a deployment can reach the process at all.

use std::convert::Infallible;
use std::env;
use std::net::SocketAddr;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};

#[tokio::main]
async fn main() {
    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);

    let suffix = env::var("TEST1").unwrap_or_else(|_| String::from("test321"));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let make_service = make_service_fn(move |_conn| {
        let suffix = suffix.clone();

        async move {
            Ok::<_, Infallible>(service_fn(move |_req: Request<Body>| {
                let body = format!("Hello World!{}", suffix);

                async move { Ok::<_, Infallible>(Response::new(Body::from(body))) }
            }))
        }
    });

    println!("Example app listening on port {}", port);

    if let Err(err) = Server::bind(&addr).serve(make_service).await {
        eprintln!("server error: {}", err);
    }
}
