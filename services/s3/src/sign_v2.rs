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

use http::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use http::request::Parts;
use http::{HeaderName, HeaderValue};
use log::debug;
use mintsign_core::hash::base64_hmac_sha1;
use mintsign_core::time::{format_http_date, now, DateTime};
use mintsign_core::{Result, SignRequest, SigningCredential, SigningRequest};

use crate::canonical::Canonicalizer;
use crate::constants::{AWS_V2_ALGORITHM, CONTENT_MD5};
use crate::Credential;

/// RequestSigner that implements the legacy S3 `AWS` authorization scheme.
///
/// - [Signing and authenticating REST requests](https://docs.aws.amazon.com/AmazonS3/latest/userguide/RESTAuthentication.html)
#[derive(Debug, Default, Clone)]
pub struct RequestSignerV2 {
    canonicalizer: Canonicalizer,

    time: Option<DateTime>,
}

impl RequestSignerV2 {
    /// Create a new V2 signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Build the string to sign of the request.
    ///
    /// ```shell
    /// GET
    /// <content-md5>
    /// <content-type>
    /// Tue, 27 Mar 2007 19:36:42 +0000
    /// <canonicalized amz headers><canonicalized resource>
    /// ```
    ///
    /// Header values are taken as raw bytes, they may carry UTF-8.
    pub fn string_to_sign(&self, req: &SigningRequest) -> Vec<u8> {
        let mut s = Vec::with_capacity(128);
        s.extend_from_slice(req.method.as_str().as_bytes());
        s.push(b'\n');
        s.extend_from_slice(req.header_get_or_default(&HeaderName::from_static(CONTENT_MD5)));
        s.push(b'\n');
        s.extend_from_slice(req.header_get_or_default(&CONTENT_TYPE));
        s.push(b'\n');
        s.extend_from_slice(req.header_get_or_default(&DATE));
        s.push(b'\n');
        s.extend_from_slice(&self.canonicalizer.canonicalized_amz_headers_v2(req));
        s.extend_from_slice(self.canonicalizer.canonicalized_resource_v2(req).as_bytes());

        s
    }
}

impl SignRequest for RequestSignerV2 {
    type Credential = Credential;

    fn sign_request(&self, req: &mut Parts, credential: Option<&Self::Credential>) -> Result<()> {
        let Some(cred) = credential.filter(|c| c.is_valid()) else {
            debug!("credential is anonymous, skip signing");
            return Ok(());
        };
        cred.check()?;

        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;

        if signed_req.headers.get(DATE).is_none() {
            signed_req
                .headers
                .insert(DATE, HeaderValue::from_str(&format_http_date(now))?);
        }

        let string_to_sign = self.string_to_sign(&signed_req);
        debug!(
            "calculated string to sign: {:?}",
            String::from_utf8_lossy(&string_to_sign)
        );

        let signature = base64_hmac_sha1(cred.secret_access_key.as_bytes(), &string_to_sign);

        let mut authorization = HeaderValue::from_str(&format!(
            "{AWS_V2_ALGORITHM} {}:{signature}",
            cred.access_key_id
        ))?;
        authorization.set_sensitive(true);
        signed_req.headers.insert(AUTHORIZATION, authorization);

        signed_req.apply(req)
    }
}
