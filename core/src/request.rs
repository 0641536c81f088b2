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

use std::borrow::Cow;
use std::str::FromStr;

use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;

use crate::{Error, Result};

/// Signing context for request.
///
/// Query pairs are kept exactly as they appear on the wire (still percent
/// encoded). A value of `None` means the parameter was sent without `=`.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, still percent encoded.
    pub path: String,
    /// HTTP query parameters in their original order.
    pub query: Vec<(String, Option<String>)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    ///
    /// The uri and headers are copied, `parts` is left untouched until
    /// [`SigningRequest::apply`]. A failed signing keeps the request as it was.
    pub fn build(parts: &http::request::Parts) -> Result<Self> {
        let authority = parts
            .uri
            .authority()
            .cloned()
            .ok_or_else(|| Error::request_invalid("request without authority is invalid for signing"))?;

        let paq = parts
            .uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: parts.uri.scheme().cloned().unwrap_or(Scheme::HTTP),
            authority,
            path: if paq.path().is_empty() {
                "/".to_string()
            } else {
                paq.path().to_string()
            },
            query: paq.query().map(Self::query_split).unwrap_or_default(),
            headers: parts.headers.clone(),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    ///
    /// The new uri is built first, `parts` is only changed once it's valid.
    pub fn apply(self, parts: &mut http::request::Parts) -> Result<()> {
        let query = self.query_string();
        let paq = if query.is_empty() {
            self.path
        } else {
            let mut s = self.path;
            s.reserve(query.len() + 1);
            s.push('?');
            s.push_str(&query);
            s
        };

        let uri = Uri::builder()
            .scheme(self.scheme)
            .authority(self.authority)
            .path_and_query(PathAndQuery::from_str(&paq)?)
            .build()?;

        parts.method = self.method;
        parts.uri = uri;
        parts.headers = self.headers;

        Ok(())
    }

    /// Split a raw query string into pairs without decoding them.
    ///
    /// ```shell
    /// "acl&prefix=a%2Fb&marker=" => [(acl, None), (prefix, Some(a%2Fb)), (marker, Some())]
    /// ```
    pub fn query_split(query: &str) -> Vec<(String, Option<String>)> {
        query
            .split('&')
            .filter(|s| !s.is_empty())
            .map(|s| match s.split_once('=') {
                Some((k, v)) => (k.to_string(), Some(v.to_string())),
                None => (s.to_string(), None),
            })
            .collect()
    }

    /// Join the query pairs back into the raw query string.
    pub fn query_string(&self) -> String {
        let mut s = String::with_capacity(self.query_size());

        for (idx, (k, v)) in self.query.iter().enumerate() {
            if idx != 0 {
                s.push('&');
            }

            s.push_str(k);
            if let Some(v) = v {
                s.push('=');
                s.push_str(v);
            }
        }

        s
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.as_ref().map_or(0, |v| v.len() + 1) + 1)
            .sum::<usize>()
    }

    /// Get the value of the last query pair with the given key.
    ///
    /// Returns `Some("")` for a parameter sent without a value.
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref().unwrap_or_default())
    }

    /// Get the path percent decoded.
    pub fn path_percent_decoded(&self) -> Result<Cow<'_, str>> {
        percent_encoding::percent_decode_str(&self.path)
            .decode_utf8()
            .map_err(|e| {
                Error::request_invalid(format!("path {} is not valid utf-8", self.path))
                    .with_source(e)
            })
    }

    /// Get header value by name.
    ///
    /// Returns the raw bytes of the value, or empty if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> &[u8] {
        self.headers.get(key).map_or(&[], |v| v.as_bytes())
    }

    /// Get all values of a header, joined by `,` in their original order.
    ///
    /// Every value is trimmed first. Values are kept as raw bytes, they are
    /// not required to be visible ASCII.
    pub fn header_get_joined(&self, key: &str) -> Vec<u8> {
        let mut s = Vec::new();
        for (idx, v) in self.headers.get_all(key).iter().enumerate() {
            if idx != 0 {
                s.push(b',');
            }
            s.extend_from_slice(v.as_bytes().trim_ascii());
        }
        s
    }

    /// Normalize header value.
    ///
    /// Leading and trailing spaces are removed.
    pub fn header_value_normalize(v: &mut HeaderValue) {
        let bs = v.as_bytes();

        let starting_index = bs.iter().position(|b| *b != b' ').unwrap_or(bs.len());
        let ending_index = bs
            .iter()
            .rposition(|b| *b != b' ')
            .map_or(starting_index, |i| i + 1);

        if starting_index == 0 && ending_index == bs.len() {
            return;
        }

        let is_sensitive = v.is_sensitive();
        // Trimming spaces from a valid header value keeps it valid.
        if let Ok(mut trimmed) = HeaderValue::from_bytes(&bs[starting_index..ending_index]) {
            trimmed.set_sensitive(is_sensitive);
            *v = trimmed;
        }
    }

    /// Get header names as sorted vector, without duplicates.
    ///
    /// Names are lowercase already, `http` normalizes them on insert.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();
        h.dedup();

        h
    }

    /// Get headers with given prefix, repeated values comma joined.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Vec<(String, Vec<u8>)> {
        self.header_name_to_vec_sorted()
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .map(|k| (k.to_string(), self.header_get_joined(k)))
            .collect()
    }

    /// Convert sorted headers to bytes.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d\n"
    /// ```
    pub fn header_to_bytes(mut headers: Vec<(String, Vec<u8>)>, sep: &str, join: &str) -> Vec<u8> {
        let mut s = Vec::with_capacity(16);

        // Sort via header name.
        headers.sort();

        for (k, v) in headers {
            s.extend_from_slice(k.as_bytes());
            s.extend_from_slice(sep.as_bytes());
            s.extend_from_slice(&v);
            s.extend_from_slice(join.as_bytes());
        }

        s
    }
}
