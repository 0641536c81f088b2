// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Display, Formatter};
use std::io::{Read, Seek};
use std::str::FromStr;

use http::header::CONTENT_LENGTH;
use http::{HeaderValue, Method, Request, Uri};
use log::debug;
use mintsign_core::time::DateTime;
use mintsign_core::{Error, Result, SignRequest};

use crate::constants::X_AMZ_CONTENT_SHA_256;
use crate::{Credential, PayloadHasher, RequestSignerV2, RequestSignerV4};

/// A request to be authenticated: the body, if any, must be seekable so it
/// can be hashed and then sent.
pub type RequestDescriptor<R> = Request<Option<R>>;

/// Build a request descriptor.
///
/// `Content-Length` is set to `content_length` when a body is given.
pub fn new_request<R: Read + Seek>(
    method: Method,
    url: &str,
    content_length: u64,
    body: Option<R>,
) -> Result<RequestDescriptor<R>> {
    let uri = Uri::from_str(url)?;

    let mut req = Request::new(body);
    *req.method_mut() = method;
    *req.uri_mut() = uri;
    if req.body().is_some() {
        req.headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from(content_length));
    }

    Ok(req)
}

/// Signature version used to authenticate a request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureVersion {
    /// The legacy `AWS` scheme.
    V2,
    /// The `AWS4-HMAC-SHA256` scheme.
    #[default]
    V4,
}

impl FromStr for SignatureVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "v2" | "s3v2" => Ok(SignatureVersion::V2),
            "v4" | "s3v4" => Ok(SignatureVersion::V4),
            v => Err(Error::config_invalid(format!(
                "signature version {v} is not supported"
            ))),
        }
    }
}

impl Display for SignatureVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureVersion::V2 => write!(f, "v2"),
            SignatureVersion::V4 => write!(f, "v4"),
        }
    }
}

/// RequestAuthenticator turns a bare request into an authenticated one.
///
/// The body is always hashed first, then the request is signed with the
/// selected signature version. Anonymous credentials only get the payload
/// headers.
#[derive(Debug, Default, Clone)]
pub struct RequestAuthenticator {
    hasher: PayloadHasher,
    v2: RequestSignerV2,
    v4: RequestSignerV4,
}

impl RequestAuthenticator {
    /// Create a new authenticator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time for both signers.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.v2 = self.v2.with_time(time);
        self.v4 = self.v4.with_time(time);
        self
    }

    /// Authenticate the request with given credential.
    pub fn authenticate<R: Read + Seek>(
        &self,
        req: RequestDescriptor<R>,
        credential: &Credential,
        version: SignatureVersion,
    ) -> Result<RequestDescriptor<R>> {
        let (mut parts, mut body) = req.into_parts();

        let digest = self.hasher.digest(body.as_mut())?;
        digest.apply(&mut parts.headers)?;

        debug!("authenticating {} {} with {version}", parts.method, parts.uri);
        match version {
            SignatureVersion::V2 => {
                parts.headers.remove(X_AMZ_CONTENT_SHA_256);
                self.v2.sign_request(&mut parts, Some(credential))?;
            }
            SignatureVersion::V4 => self.v4.sign_request(&mut parts, Some(credential))?,
        }

        Ok(Request::from_parts(parts, body))
    }
}
