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

use std::env;
use std::io::Cursor;

use anyhow::Result;
use http::{Request, StatusCode};
use log::debug;
use mintsign_core::{Context, OsEnv, ProvideCredential};
use mintsign_s3::{Config, Credential, EnvCredentialProvider, RequestAuthenticator, RequestDescriptor};
use reqwest::Client;

mod live;
mod offline;

/// Initialize a test against a real server.
///
/// Returns `None` unless `MINTSIGN_S3_TEST` is `on`.
pub async fn init_signing_test() -> Option<(Config, Credential)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("MINTSIGN_S3_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new().with_env(OsEnv);
    let config = Config::default()
        .from_env(&ctx)
        .expect("config must be valid");
    let cred = EnvCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .expect("load credential must succeed")
        .unwrap_or_else(Credential::anonymous);

    Some((config, cred))
}

/// Authenticate and send the request, returns the status and body.
pub async fn send_authenticated_request(
    config: &Config,
    cred: &Credential,
    req: RequestDescriptor<Cursor<Vec<u8>>>,
) -> Result<(StatusCode, String)> {
    let req = RequestAuthenticator::new().authenticate(req, cred, config.signature_version)?;
    debug!("authenticated request: {req:?}");

    let (parts, body) = req.into_parts();
    let body = body.map(Cursor::into_inner).unwrap_or_default();
    let req: reqwest::Request = Request::from_parts(parts, body).try_into()?;

    let resp = Client::new().execute(req).await?;
    let status = resp.status();
    let body = resp.text().await?;

    debug!("response status: {status}, body: {body}");
    Ok((status, body))
}
