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

//! S3 request signing for conformance testing.
//!
//! Supports both the legacy `AWS` scheme (Signature Version 2) and
//! `AWS4-HMAC-SHA256` (Signature Version 4), always for `us-east-1` and `s3`.
//!
//! ## Example
//!
//! ```no_run
//! use std::io::Cursor;
//!
//! use http::Method;
//! use mintsign_s3::{new_request, Credential, RequestAuthenticator, SignatureVersion};
//!
//! # fn example() -> mintsign_core::Result<()> {
//! let body = b"Hello, World!".to_vec();
//! let req = new_request(
//!     Method::PUT,
//!     "http://127.0.0.1:9000/bucket/object",
//!     body.len() as u64,
//!     Some(Cursor::new(body)),
//! )?;
//!
//! let req = RequestAuthenticator::new().authenticate(
//!     req,
//!     &Credential::new("minio", "minio123"),
//!     SignatureVersion::V4,
//! )?;
//! assert!(req.headers().contains_key(http::header::AUTHORIZATION));
//! # Ok(())
//! # }
//! ```
//!
//! Requests can also be signed through [`mintsign_core::Signer`] with one of
//! the credential providers, using [`RequestSignerV2`] or [`RequestSignerV4`]
//! as the request signer. Those expect the payload headers to be set by
//! [`PayloadHasher`] already.

#![warn(missing_docs)]

mod constants;
pub use constants::CONTENT_MD5;
pub use constants::X_AMZ_CONTENT_SHA_256;
pub use constants::X_AMZ_DATE;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod canonical;
pub use canonical::Canonicalizer;

mod payload;
pub use payload::PayloadDigest;
pub use payload::PayloadHasher;

mod sign_v2;
pub use sign_v2::RequestSignerV2;

mod sign_v4;
pub use sign_v4::RequestSignerV4;

mod authenticator;
pub use authenticator::new_request;
pub use authenticator::RequestAuthenticator;
pub use authenticator::RequestDescriptor;
pub use authenticator::SignatureVersion;
