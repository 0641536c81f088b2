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

use std::collections::HashMap;
use std::io::{Cursor, Seek, SeekFrom, Write};

use anyhow::Result;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use http::header::{AUTHORIZATION, DATE};
use http::Method;
use mintsign_core::time::DateTime;
use mintsign_core::{Context, Signer, StaticEnv};
use mintsign_s3::{
    new_request, Credential, EnvCredentialProvider, PayloadHasher, RequestAuthenticator,
    RequestSignerV4, SignatureVersion, StaticCredentialProvider, CONTENT_MD5,
    X_AMZ_CONTENT_SHA_256,
};
use pretty_assertions::assert_eq;
use sha1::Sha1;

type Body = Cursor<Vec<u8>>;

fn signing_time() -> DateTime {
    Utc.with_ymd_and_hms(2013, 5, 24, 0, 0, 0)
        .single()
        .expect("time must be valid")
}

fn credential() -> Credential {
    Credential::new("minio", "minio123")
}

#[test]
fn test_v2_matches_independent_hmac() -> Result<()> {
    let req = new_request(
        Method::PUT,
        "http://127.0.0.1:9000/bucket/object?uploadId=abc&partNumber=2&x-id=UploadPart",
        5,
        Some(Cursor::new(b"hello".to_vec())),
    )?;
    let req = RequestAuthenticator::new()
        .with_time(signing_time())
        .authenticate(req, &credential(), SignatureVersion::V2)?;

    let string_to_sign = "PUT\n\
        XUFAKrxLKna5cZ2REBfFkg==\n\
        \n\
        Fri, 24 May 2013 00:00:00 GMT\n\
        /bucket/object?partNumber=2&uploadId=abc";
    let mut mac =
        Hmac::<Sha1>::new_from_slice(b"minio123").expect("hmac accepts keys of any length");
    mac.update(string_to_sign.as_bytes());
    let expected = BASE64_STANDARD.encode(mac.finalize().into_bytes());

    assert_eq!(req.headers()[DATE], "Fri, 24 May 2013 00:00:00 GMT");
    assert_eq!(
        req.headers()[AUTHORIZATION].to_str()?,
        format!("AWS minio:{expected}")
    );
    assert!(req.headers().get(X_AMZ_CONTENT_SHA_256).is_none());
    Ok(())
}

#[tokio::test]
async fn test_signer_with_env_credential() -> Result<()> {
    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from([
            ("ACCESS_KEY".to_string(), "minio".to_string()),
            ("SECRET_KEY".to_string(), "minio123".to_string()),
        ]),
    });
    let signer = Signer::new(
        ctx,
        EnvCredentialProvider::new(),
        RequestSignerV4::new().with_time(signing_time()),
    );

    let mut req = new_request(
        Method::PUT,
        "http://127.0.0.1:9000/bucket/object",
        5,
        Some(Cursor::new(b"hello".to_vec())),
    )?;
    PayloadHasher::new().hash(&mut req)?;
    let (mut parts, _) = req.into_parts();
    signer.sign(&mut parts).await?;

    let expected = RequestAuthenticator::new()
        .with_time(signing_time())
        .authenticate(
            new_request(
                Method::PUT,
                "http://127.0.0.1:9000/bucket/object",
                5,
                Some(Cursor::new(b"hello".to_vec())),
            )?,
            &credential(),
            SignatureVersion::V4,
        )?;

    assert_eq!(parts.headers[AUTHORIZATION], expected.headers()[AUTHORIZATION]);
    Ok(())
}

#[tokio::test]
async fn test_signer_without_credential() -> Result<()> {
    let signer = Signer::new(Context::new(), EnvCredentialProvider::new(), RequestSignerV4::new());

    let mut req = new_request::<Body>(Method::GET, "http://127.0.0.1:9000/bucket", 0, None)?;
    PayloadHasher::new().hash(&mut req)?;
    let (mut parts, _) = req.into_parts();
    signer.sign(&mut parts).await?;

    assert!(parts.headers.get(AUTHORIZATION).is_none());
    Ok(())
}

#[tokio::test]
async fn test_signer_with_static_credential() -> Result<()> {
    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new("minio", "minio123"),
        RequestSignerV4::new().with_time(signing_time()),
    );

    let mut req = new_request::<Body>(Method::GET, "http://127.0.0.1:9000/bucket?location", 0, None)?;
    PayloadHasher::new().hash(&mut req)?;
    let (mut parts, _) = req.into_parts();
    signer.sign(&mut parts).await?;

    assert_eq!(parts.uri.query(), Some("location="));
    assert!(parts.headers[AUTHORIZATION].to_str()?.starts_with(
        "AWS4-HMAC-SHA256 Credential=minio/20130524/us-east-1/s3/aws4_request, \
         SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature="
    ));
    Ok(())
}

#[test]
fn test_file_body() -> Result<()> {
    let content = b"Welcome to Amazon S3.";
    let mut file = tempfile::tempfile()?;
    file.write_all(content)?;
    file.seek(SeekFrom::Start(0))?;

    let req = new_request(
        Method::PUT,
        "http://examplebucket.s3.amazonaws.com/test$file.text",
        content.len() as u64,
        Some(file),
    )?;
    let req = RequestAuthenticator::new()
        .with_time(signing_time())
        .authenticate(req, &credential(), SignatureVersion::V4)?;

    assert_eq!(
        req.headers()[X_AMZ_CONTENT_SHA_256],
        "44ce7dd67c959e0d3524ffac1771dfbba87d2b6b4b4e99e42034a8b803f8b072"
    );
    assert_eq!(
        req.headers()[CONTENT_MD5],
        mintsign_core::hash::base64_md5(content).as_str()
    );

    let mut file = req.into_body().expect("body must be kept");
    assert_eq!(file.stream_position()?, 0);
    Ok(())
}
