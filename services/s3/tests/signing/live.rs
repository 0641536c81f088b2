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

use std::io::Cursor;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use http::{Method, StatusCode};
use log::warn;
use mintsign_s3::{new_request, Config, Credential};

use super::{init_signing_test, send_authenticated_request};

type Body = Cursor<Vec<u8>>;

fn bucket_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time must be after epoch")
        .as_nanos();
    format!("mintsign-test-{nanos}")
}

async fn send(
    config: &Config,
    cred: &Credential,
    method: Method,
    url: &str,
    body: Option<&[u8]>,
) -> Result<(StatusCode, String)> {
    let req = new_request(
        method,
        url,
        body.map_or(0, |b| b.len() as u64),
        body.map(|b| Cursor::new(b.to_vec())),
    )?;
    send_authenticated_request(config, cred, req).await
}

#[tokio::test]
async fn test_list_buckets() -> Result<()> {
    let Some((config, cred)) = init_signing_test().await else {
        warn!("MINTSIGN_S3_TEST is not set, skipped");
        return Ok(());
    };

    let url = config.target_url("", "", &[])?;
    let req = new_request::<Body>(Method::GET, &url, 0, None)?;
    let (status, body) = send_authenticated_request(&config, &cred, req).await?;

    assert_eq!(StatusCode::OK, status);
    assert!(body.contains("ListAllMyBucketsResult"));
    Ok(())
}

#[tokio::test]
async fn test_head_not_exist_bucket() -> Result<()> {
    let Some((config, cred)) = init_signing_test().await else {
        warn!("MINTSIGN_S3_TEST is not set, skipped");
        return Ok(());
    };

    let url = config.target_url(&bucket_name(), "", &[])?;
    let (status, _) = send(&config, &cred, Method::HEAD, &url, None).await?;

    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_object_lifecycle() -> Result<()> {
    let Some((config, cred)) = init_signing_test().await else {
        warn!("MINTSIGN_S3_TEST is not set, skipped");
        return Ok(());
    };

    let bucket = bucket_name();
    let object = "dir/файл with spaces+plus.txt";
    let content = b"Hello, World!";

    let (status, body) = send(&config, &cred, Method::PUT, &config.target_url(&bucket, "", &[])?, None).await?;
    assert_eq!(StatusCode::OK, status, "make bucket: {body}");

    let url = config.target_url(&bucket, object, &[])?;
    let (status, body) = send(&config, &cred, Method::PUT, &url, Some(content)).await?;
    assert_eq!(StatusCode::OK, status, "put object: {body}");

    let (status, body) = send(&config, &cred, Method::GET, &url, None).await?;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(body.as_bytes(), content);

    let list = config.target_url(&bucket, "", &[("prefix", "dir/"), ("max-keys", "10")])?;
    let (status, body) = send(&config, &cred, Method::GET, &list, None).await?;
    assert_eq!(StatusCode::OK, status);
    assert!(body.contains("<KeyCount>1</KeyCount>") || body.contains("<Key>"));

    let location = config.target_url(&bucket, "", &[("location", "")])?;
    let (status, _) = send(&config, &cred, Method::GET, &location, None).await?;
    assert_eq!(StatusCode::OK, status);

    let (status, _) = send(&config, &cred, Method::DELETE, &url, None).await?;
    assert_eq!(StatusCode::NO_CONTENT, status);

    let (status, _) = send(&config, &cred, Method::DELETE, &config.target_url(&bucket, "", &[])?, None).await?;
    assert_eq!(StatusCode::NO_CONTENT, status);
    Ok(())
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() -> Result<()> {
    let Some((config, cred)) = init_signing_test().await else {
        warn!("MINTSIGN_S3_TEST is not set, skipped");
        return Ok(());
    };
    if cred.is_anonymous() {
        warn!("credential is anonymous, skipped");
        return Ok(());
    }

    let wrong = Credential::new(&cred.access_key_id, "not-the-secret-key");
    let url = config.target_url("", "", &[])?;
    let (status, body) = send(&config, &wrong, Method::GET, &url, None).await?;

    assert_eq!(StatusCode::FORBIDDEN, status);
    assert!(body.contains("SignatureDoesNotMatch"));
    Ok(())
}
