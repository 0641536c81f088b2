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

//! Canonical forms of a request shared by the V2 and V4 signers.

use std::borrow::Cow;

use http::header;
use mintsign_core::{Error, Result, SigningRequest};
use percent_encoding::{percent_decode, percent_decode_str, percent_encode, utf8_percent_encode};

use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, SUB_RESOURCES, UNSIGNED_HEADERS};

/// Canonicalizer builds the canonical pieces of a request.
///
/// It holds the V2 sub-resource allow-list and the headers that V4 never
/// signs. Both lists are fixed at construction, so one value can be shared
/// between threads freely.
#[derive(Debug, Clone, Copy)]
pub struct Canonicalizer {
    sub_resources: &'static [&'static str],
    unsigned_headers: &'static [&'static str],
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canonicalizer {
    /// Create a canonicalizer with the S3 sub-resources and unsigned headers.
    pub fn new() -> Self {
        Self {
            sub_resources: SUB_RESOURCES,
            unsigned_headers: UNSIGNED_HEADERS,
        }
    }

    /// Percent encode a string with the AWS unreserved set.
    ///
    /// `A-Z a-z 0-9 - _ . ~ /` are kept, every other byte of the UTF-8
    /// encoding becomes `%XX` in upper case.
    pub fn encode_uri_component(s: &str) -> Cow<'_, str> {
        utf8_percent_encode(s, &AWS_URI_ENCODE_SET).into()
    }

    /// Decode a percent encoded string.
    pub fn decode_percent_encoding(s: &str) -> Result<Cow<'_, str>> {
        percent_decode_str(s).decode_utf8().map_err(|e| {
            Error::request_invalid(format!("{s} is not valid utf-8 after decoding")).with_source(e)
        })
    }

    /// Build the V4 canonical URI of the request.
    pub fn canonical_uri(&self, req: &SigningRequest) -> Result<String> {
        let path = req.path_percent_decoded()?;
        Ok(Self::encode_uri_component(&path).into_owned())
    }

    /// Build the V4 canonical query pairs of the request.
    ///
    /// Every raw key and value is form decoded into bytes, then encoded
    /// again with `/` escaped and space as `%20`. Decoding works on bytes, so
    /// an escape that isn't valid UTF-8 such as `%FF` is sent as is. Pairs are
    /// sorted by key and then by value. A parameter sent without value gets an
    /// empty one, so the returned pairs always render as `key=value`.
    pub fn canonical_query(&self, req: &SigningRequest) -> Vec<(String, Option<String>)> {
        let mut query = req
            .query
            .iter()
            .map(|(k, v)| {
                (
                    Self::reencode_query_component(k),
                    Self::reencode_query_component(v.as_deref().unwrap_or_default()),
                )
            })
            .collect::<Vec<_>>();
        query.sort();

        query.into_iter().map(|(k, v)| (k, Some(v))).collect()
    }

    fn reencode_query_component(s: &str) -> String {
        // `+` is a space in form encoding, `%2B` stays a literal plus.
        let bs = s
            .bytes()
            .map(|b| if b == b'+' { b' ' } else { b })
            .collect::<Vec<u8>>();
        let decoded = percent_decode(&bs).collect::<Vec<u8>>();
        percent_encode(&decoded, &AWS_QUERY_ENCODE_SET).to_string()
    }

    /// Build the V4 canonical headers block and the signed header names.
    ///
    /// ```shell
    /// host:example.com\nx-amz-date:20130524T000000Z\n => ["host", "x-amz-date"]
    /// ```
    ///
    /// `host` is always signed. It's taken from the authority of the request
    /// when the header map doesn't carry it, as `host[:port]` without any
    /// userinfo. Header values are kept as raw bytes.
    pub fn canonical_headers(&self, req: &SigningRequest) -> (Vec<u8>, Vec<String>) {
        let mut headers = req
            .header_name_to_vec_sorted()
            .into_iter()
            .filter(|k| !self.unsigned_headers.iter().any(|h| h == k))
            .map(|k| (k.to_string(), req.header_get_joined(k)))
            .collect::<Vec<_>>();

        if req.headers.get(header::HOST).is_none() {
            headers.push((header::HOST.to_string(), Self::host(req).into_bytes()));
        }

        let mut signed = headers.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>();
        signed.sort_unstable();

        (SigningRequest::header_to_bytes(headers, ":", "\n"), signed)
    }

    /// Host of the request authority, with the port when one is given.
    fn host(req: &SigningRequest) -> String {
        match req.authority.port() {
            Some(port) => format!("{}:{}", req.authority.host(), port.as_str()),
            None => req.authority.host().to_string(),
        }
    }

    /// Build the V2 canonicalized resource.
    ///
    /// The raw path followed by the allow-listed sub-resources in their fixed
    /// order. Values are kept exactly as sent.
    pub fn canonicalized_resource_v2(&self, req: &SigningRequest) -> String {
        let mut s = req.path.clone();

        let mut first = true;
        for key in self.sub_resources {
            let Some(value) = req.query_get(key) else {
                continue;
            };

            s.push(if first { '?' } else { '&' });
            first = false;

            s.push_str(key);
            if !value.is_empty() {
                s.push('=');
                s.push_str(value);
            }
        }

        s
    }

    /// Build the V2 canonicalized amz headers.
    ///
    /// Every `x-amz-*` header as `name:value\n`, sorted by name. Returns
    /// nothing when there is none.
    pub fn canonicalized_amz_headers_v2(&self, req: &SigningRequest) -> Vec<u8> {
        let headers = req.header_to_vec_with_prefix("x-amz-");
        SigningRequest::header_to_bytes(headers, ":", "\n")
    }
}
