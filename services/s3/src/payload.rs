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

use std::io::{self, Read, Seek, SeekFrom};

use http::{HeaderMap, HeaderName, HeaderValue};
use log::debug;
use mintsign_core::hash::{PayloadDigester, EMPTY_STRING_SHA256};
use mintsign_core::{Error, Result};

use crate::constants::{CONTENT_MD5, X_AMZ_CONTENT_SHA_256};

const READ_BUFFER_SIZE: usize = 32 * 1024;

/// Digest of a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadDigest {
    /// Hex encoded SHA256 of the body, the value of `x-amz-content-sha256`.
    pub sha256_hex: String,
    /// Base64 encoded MD5 of the body, only set for a non-empty body.
    pub content_md5: Option<String>,
}

impl Default for PayloadDigest {
    fn default() -> Self {
        Self {
            sha256_hex: EMPTY_STRING_SHA256.to_string(),
            content_md5: None,
        }
    }
}

impl PayloadDigest {
    /// Set the digest headers, overwriting any existing value.
    ///
    /// `Content-Md5` is left untouched when the body is empty.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(
            HeaderName::from_static(X_AMZ_CONTENT_SHA_256),
            HeaderValue::from_str(&self.sha256_hex)?,
        );
        if let Some(md5) = &self.content_md5 {
            headers.insert(
                HeaderName::from_static(CONTENT_MD5),
                HeaderValue::from_str(md5)?,
            );
        }
        Ok(())
    }
}

/// PayloadHasher computes the SHA256 and MD5 digests of a request body.
///
/// The body is streamed through both digests in one pass and rewound to the
/// start afterwards, so it can still be sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct PayloadHasher;

impl PayloadHasher {
    /// Create a new payload hasher.
    pub fn new() -> Self {
        Self
    }

    /// Compute the digest of the body.
    ///
    /// No body and an empty body share the same digest.
    pub fn digest<R: Read + Seek>(&self, body: Option<&mut R>) -> Result<PayloadDigest> {
        let Some(body) = body else {
            return Ok(PayloadDigest::default());
        };

        let mut digester = PayloadDigester::new();
        let mut buf = vec![0; READ_BUFFER_SIZE];
        loop {
            match body.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => digester.update(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(Error::payload_read("failed to read request body").with_source(e))
                }
            }
        }

        body.seek(SeekFrom::Start(0))
            .map_err(|e| Error::payload_read("failed to rewind request body").with_source(e))?;

        if digester.is_empty() {
            return Ok(PayloadDigest::default());
        }

        let size = digester.len();
        let (sha256_hex, content_md5) = digester.finish();
        debug!("calculated payload digest of {size} bytes: {sha256_hex}");

        Ok(PayloadDigest {
            sha256_hex,
            content_md5: Some(content_md5),
        })
    }

    /// Hash the body of the request and set the digest headers on it.
    pub fn hash<R: Read + Seek>(&self, req: &mut http::Request<Option<R>>) -> Result<PayloadDigest> {
        let digest = self.digest(req.body_mut().as_mut())?;
        digest.apply(req.headers_mut())?;
        Ok(digest)
    }
}
