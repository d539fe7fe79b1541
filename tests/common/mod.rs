// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Ambiverse client library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! In-process mock of the Ambiverse service.

#![allow(dead_code)]

use ambiverse_client::ClientConfig;
use serde_json::Value;
use std::net::TcpListener;
use tide::{Body, Response, StatusCode};

/// Serve `app` on a free loopback port and return a configuration pointing at it.
pub fn serve(app: tide::Server<()>) -> ClientConfig {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock service");
    let port = listener.local_addr().expect("mock service address").port();
    async_std::task::spawn(app.listen(listener));
    ClientConfig::new("127.0.0.1").with_port(port)
}

/// A JSON response with the given status.
pub fn respond(status: StatusCode, body: Value) -> tide::Result<Response> {
    Ok(Response::builder(status)
        .body(Body::from_json(&body)?)
        .build())
}

/// The Content-Type header of a request, if any.
pub fn content_type(req: &tide::Request<()>) -> Option<String> {
    req.header("Content-Type")
        .map(|values| values.as_str().to_string())
}

/// A configuration pointing at a port nothing listens on.
pub fn unreachable() -> ClientConfig {
    ClientConfig::new("127.0.0.1").with_port(1)
}
