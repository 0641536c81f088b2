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

use mintsign_core::{Context, Error, Result};
use percent_encoding::utf8_percent_encode;

use crate::canonical::Canonicalizer;
use crate::constants::*;
use crate::SignatureVersion;

/// Config for the s3 conformance target.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `host[:port]` of the server under test.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SERVER_ENDPOINT`], then [`S3_ENDPOINT`]
    pub endpoint: Option<String>,
    /// Use `https` to reach the endpoint.
    ///
    /// - env value: [`ENABLE_HTTPS`]
    pub enable_https: bool,
    /// Signature version used to authenticate requests.
    ///
    /// - env value: [`SIGNATURE_VERSION`], `v4` by default.
    pub signature_version: SignatureVersion,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        let envs = ctx.env_vars();

        if self.endpoint.is_none() {
            self.endpoint = envs
                .get(SERVER_ENDPOINT)
                .or_else(|| envs.get(S3_ENDPOINT))
                .filter(|v| !v.is_empty())
                .cloned();
        }
        if let Some(v) = envs.get(ENABLE_HTTPS) {
            self.enable_https = parse_bool(v)?;
        }
        if let Some(v) = envs.get(SIGNATURE_VERSION).filter(|v| !v.is_empty()) {
            self.signature_version = v.parse()?;
        }

        Ok(self)
    }

    /// Get the endpoint url like `http://127.0.0.1:9000`.
    pub fn endpoint_url(&self) -> Result<String> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| Error::config_invalid("endpoint is not set"))?;
        let scheme = if self.enable_https { "https" } else { "http" };

        Ok(format!("{scheme}://{endpoint}"))
    }

    /// Build a path-style url for the bucket and object.
    ///
    /// Object names are encoded with `/` kept. Query keys are sorted and
    /// values of the same key keep their order, both encoded with `/`
    /// escaped.
    pub fn target_url(
        &self,
        bucket: &str,
        object: &str,
        query: &[(&str, &str)],
    ) -> Result<String> {
        let mut url = self.endpoint_url()?;
        url.push('/');

        if !bucket.is_empty() {
            url.push_str(bucket);
            url.push('/');
        }
        if !object.is_empty() {
            url.push_str(&Canonicalizer::encode_uri_component(object));
        }

        if query.is_empty() {
            return Ok(url);
        }

        let mut query = query.to_vec();
        // Stable sort by key only.
        query.sort_by_key(|(k, _)| *k);

        url.push('?');
        for (idx, (k, v)) in query.into_iter().enumerate() {
            if idx != 0 {
                url.push('&');
            }
            url.push_str(&encode_query_component(k));
            url.push('=');
            url.push_str(&encode_query_component(v));
        }

        Ok(url)
    }
}

fn encode_query_component(s: &str) -> Cow<'_, str> {
    utf8_percent_encode(s, &AWS_QUERY_ENCODE_SET).into()
}

/// Parse a boolean the way the conformance harness does.
fn parse_bool(s: &str) -> Result<bool> {
    match s {
        "" | "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        v => Err(Error::config_invalid(format!(
            "{ENABLE_HTTPS} must be a boolean, got {v}"
        ))),
    }
}
