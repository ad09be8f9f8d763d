//! HTTP transport for the list editor boundary.
//!
//! `tiny_http::Server::recv` blocks, so accepting runs on a blocking thread
//! that forwards requests over a channel. Requests are then handled one at
//! a time on the async side, which keeps store writes serialized.
//!
//! ```text
//! GET  <list_path>   200 editor view
//! POST <list_path>   see `boundary`
//! other methods      405
//! other paths        404
//! oversized bodies   413
//! ```

use std::future::Future;
use std::io::{Cursor, Read};
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::boundary::{BAD_REQUEST, Boundary, Reply, SERVER_ERROR};

const NOT_FOUND: u16 = 404;
const METHOD_NOT_ALLOWED: u16 = 405;
const PAYLOAD_TOO_LARGE: u16 = 413;

/// Queued requests waiting for the handler.
const BACKLOG: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Load,
    Submit,
    NotFound,
    MethodNotAllowed,
}

fn route(method: &Method, url: &str, list_path: &str) -> Route {
    let path = url.split_once('?').map_or(url, |(path, _)| path);
    if path != list_path {
        return Route::NotFound;
    }
    match method {
        Method::Get | Method::Head => Route::Load,
        Method::Post => Route::Submit,
        _ => Route::MethodNotAllowed,
    }
}

#[derive(Debug)]
enum BodyError {
    TooLarge,
    Unreadable(std::io::Error),
}

fn read_body(reader: &mut dyn Read, declared: Option<usize>, max_bytes: usize) -> Result<String, BodyError> {
    if declared.is_some_and(|len| len > max_bytes) {
        return Err(BodyError::TooLarge);
    }
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut body = String::new();
    reader
        .take(limit)
        .read_to_string(&mut body)
        .map_err(BodyError::Unreadable)?;
    if body.len() > max_bytes {
        return Err(BodyError::TooLarge);
    }
    Ok(body)
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name, value).ok()
}

fn json_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    let response = Response::from_string(body).with_status_code(status);
    match header("Content-Type", "application/json") {
        Some(content_type) => response.with_header(content_type),
        None => response,
    }
}

fn error_response(status: u16, message: &str) -> Response<Cursor<Vec<u8>>> {
    json_response(status, json!({ "error": message }).to_string())
}

fn to_response(reply: &Reply) -> Response<Cursor<Vec<u8>>> {
    let mut response = match &reply.body {
        Some(body) => match serde_json::to_string(body) {
            Ok(text) => json_response(reply.status, text),
            Err(error) => return error_response(SERVER_ERROR, &error.to_string()),
        },
        None => Response::from_string(String::new()).with_status_code(reply.status),
    };
    if let Some(location) = reply.location.as_deref().and_then(|location| header("Location", location)) {
        response = response.with_header(location);
    }
    response
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(boundary: &Boundary<'_>, addr: SocketAddr, max_body_bytes: usize) -> anyhow::Result<()> {
    let server = Server::http(addr).map_err(|error| anyhow::anyhow!("failed to bind {addr}: {error}"))?;
    let local = server.server_addr().to_ip().context("server has no IP address")?;
    tracing::info!(addr = %local, list_path = boundary.list_path(), "listening");
    eprintln!("Serving notes at http://{local}{}", boundary.list_path());

    serve_on(Arc::new(server), boundary, max_body_bytes, async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await;
    tracing::info!("server stopped");
    Ok(())
}

async fn serve_on(
    server: Arc<Server>,
    boundary: &Boundary<'_>,
    max_body_bytes: usize,
    shutdown: impl Future<Output = ()>,
) {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<Request>(BACKLOG);
    let acceptor = {
        let server = Arc::clone(&server);
        tokio::task::spawn_blocking(move || {
            for request in server.incoming_requests() {
                if tx.blocking_send(request).is_err() {
                    break;
                }
            }
        })
    };

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            request = rx.recv() => {
                let Some(request) = request else { break };
                handle(boundary, request, max_body_bytes).await;
            }
            () = &mut shutdown => break,
        }
    }

    server.unblock();
    drop(rx);
    if let Err(error) = acceptor.await {
        tracing::warn!(%error, "acceptor thread ended abnormally");
    }
}

async fn handle(boundary: &Boundary<'_>, mut request: Request, max_body_bytes: usize) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let response = match route(&method, &url, boundary.list_path()) {
        Route::Load => to_response(&boundary.load().await),
        Route::Submit => {
            let declared = request.body_length();
            match read_body(request.as_reader(), declared, max_body_bytes) {
                Ok(body) => to_response(&boundary.submit(&body).await),
                Err(BodyError::TooLarge) => error_response(PAYLOAD_TOO_LARGE, "request body too large"),
                Err(BodyError::Unreadable(error)) => error_response(BAD_REQUEST, &error.to_string()),
            }
        }
        Route::NotFound => error_response(NOT_FOUND, "not found"),
        Route::MethodNotAllowed => {
            let response = error_response(METHOD_NOT_ALLOWED, "method not allowed");
            match header("Allow", "GET, POST") {
                Some(allow) => response.with_header(allow),
                None => response,
            }
        }
    };

    let status = response.status_code().0;
    tracing::debug!(%method, %url, status, "request");
    if let Err(error) = request.respond(response) {
        tracing::warn!(%error, %url, "failed to send response");
    }
}
