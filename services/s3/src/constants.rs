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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// Hex encoded SHA256 of the request body.
pub const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
/// Signing time of a V4 request.
pub const X_AMZ_DATE: &str = "x-amz-date";
/// Base64 encoded MD5 of a non-empty request body.
pub const CONTENT_MD5: &str = "content-md5";

// Signing algorithms.
pub const AWS_V2_ALGORITHM: &str = "AWS";
pub const AWS_V4_ALGORITHM: &str = "AWS4-HMAC-SHA256";

// The conformance harness always signs for this region and service.
pub const DEFAULT_REGION: &str = "us-east-1";
pub const S3_SERVICE: &str = "s3";

// Env values used by the conformance harness.
pub const SERVER_ENDPOINT: &str = "SERVER_ENDPOINT";
pub const S3_ENDPOINT: &str = "S3_ENDPOINT";
pub const ENABLE_HTTPS: &str = "ENABLE_HTTPS";
pub const SIGNATURE_VERSION: &str = "SIGNATURE_VERSION";
pub const ACCESS_KEY: &str = "ACCESS_KEY";
pub const SECRET_KEY: &str = "SECRET_KEY";

/// Sub-resources that take part in the V2 canonicalized resource.
///
/// The order matters: parameters are emitted in this order.
pub const SUB_RESOURCES: &[&str] = &[
    "acl",
    "delete",
    "lifecycle",
    "location",
    "logging",
    "notification",
    "partNumber",
    "policy",
    "requestPayment",
    "torrent",
    "uploadId",
    "uploads",
    "versionId",
    "versioning",
    "versions",
    "website",
];

/// Headers that are never part of the V4 signed headers.
pub const UNSIGNED_HEADERS: &[&str] = &["authorization", "content-type", "content-length", "user-agent"];

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', '~' and '/'.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// But used in query, where `/` must be encoded too.
pub static AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
