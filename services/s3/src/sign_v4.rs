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

use std::fmt::Write;

use http::header::AUTHORIZATION;
use http::request::Parts;
use http::{HeaderName, HeaderValue};
use log::debug;
use mintsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use mintsign_core::time::{format_date, format_iso8601, now, DateTime};
use mintsign_core::{Error, Result, SignRequest, SigningCredential, SigningRequest};

use crate::canonical::Canonicalizer;
use crate::constants::{AWS_V4_ALGORITHM, DEFAULT_REGION, S3_SERVICE, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE};
use crate::Credential;

/// RequestSigner that implements AWS SigV4 for S3.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The request must carry `x-amz-content-sha256` before it reaches this
/// signer. The canonical query replaces the query the request is sent with.
#[derive(Debug, Clone)]
pub struct RequestSignerV4 {
    canonicalizer: Canonicalizer,
    service: &'static str,
    region: &'static str,

    time: Option<DateTime>,
}

impl Default for RequestSignerV4 {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSignerV4 {
    /// Create a new V4 signer for s3 in `us-east-1`.
    pub fn new() -> Self {
        Self {
            canonicalizer: Canonicalizer::new(),
            service: S3_SERVICE,
            region: DEFAULT_REGION,

            time: None,
        }
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

    fn scope(&self, now: DateTime) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            format_date(now),
            self.region,
            self.service
        )
    }
}

impl SignRequest for RequestSignerV4 {
    type Credential = Credential;

    fn sign_request(&self, req: &mut Parts, credential: Option<&Self::Credential>) -> Result<()> {
        if req.headers.get(X_AMZ_CONTENT_SHA_256).is_none() {
            return Err(Error::missing_hashed_payload(format!(
                "{X_AMZ_CONTENT_SHA_256} must be set before signing"
            )));
        }

        let Some(cred) = credential.filter(|c| c.is_valid()) else {
            debug!("credential is anonymous, skip signing");
            return Ok(());
        };
        cred.check()?;

        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;

        // canonicalize context
        for (_, value) in signed_req.headers.iter_mut() {
            SigningRequest::header_value_normalize(value)
        }
        signed_req.headers.insert(
            HeaderName::from_static(X_AMZ_DATE),
            HeaderValue::from_str(&format_iso8601(now))?,
        );
        signed_req.query = self.canonicalizer.canonical_query(&signed_req);

        // build canonical request and string to sign.
        let (creq, signed_headers) = canonical_request_string(&self.canonicalizer, &signed_req)?;
        debug!(
            "calculated canonical request: {:?}",
            String::from_utf8_lossy(&creq)
        );
        let encoded_req = hex_sha256(&creq);

        // Scope: "20130524/us-east-1/s3/aws4_request"
        let scope = self.scope(now);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(now, &scope, &encoded_req)?;
        debug!("calculated string to sign: {string_to_sign:?}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, self.region, self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{AWS_V4_ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            cred.access_key_id,
        ))?;
        authorization.set_sensitive(true);
        signed_req.headers.insert(AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)
    }
}

/// Returns the canonical request and the signed header list joined by `;`.
///
/// The query of the request must be canonical already. Header values are
/// copied as raw bytes, so the canonical request isn't always valid UTF-8.
fn canonical_request_string(
    canonicalizer: &Canonicalizer,
    req: &SigningRequest,
) -> Result<(Vec<u8>, String)> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = Vec::with_capacity(256);

    f.extend_from_slice(req.method.as_str().as_bytes());
    f.push(b'\n');
    f.extend_from_slice(canonicalizer.canonical_uri(req)?.as_bytes());
    f.push(b'\n');
    f.extend_from_slice(req.query_string().as_bytes());
    f.push(b'\n');

    let (headers, signed) = canonicalizer.canonical_headers(req);
    let signed_headers = signed.join(";");
    // The header block ends with `\n` already, this adds the blank line.
    f.extend_from_slice(&headers);
    f.push(b'\n');
    f.extend_from_slice(signed_headers.as_bytes());
    f.push(b'\n');
    f.extend_from_slice(req.header_get_or_default(&HeaderName::from_static(X_AMZ_CONTENT_SHA_256)));

    Ok((f, signed_headers))
}

// StringToSign:
//
// AWS4-HMAC-SHA256
// 20130524T000000Z
// 20130524/us-east-1/s3/aws4_request
// <hashed_canonical_request>
fn string_to_sign(now: DateTime, scope: &str, encoded_req: &str) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{AWS_V4_ALGORITHM}")?;
    writeln!(f, "{}", format_iso8601(now))?;
    writeln!(f, "{scope}")?;
    write!(f, "{encoded_req}")?;
    Ok(f)
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}
