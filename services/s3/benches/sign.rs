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

use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use mintsign_s3::{new_request, Credential, RequestAuthenticator, SignatureVersion};

criterion_group!(benches, bench);
criterion_main!(benches);

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("s3");

    let cred = Credential::new("access_key_id", "secret_access_key");
    let authenticator = RequestAuthenticator::new();
    let body = vec![b'x'; 64 * 1024];

    for version in [SignatureVersion::V2, SignatureVersion::V4] {
        group.bench_function(format!("{version}_get"), |b| {
            b.iter(|| {
                let req = new_request::<Cursor<Vec<u8>>>(
                    Method::GET,
                    "http://127.0.0.1:9000/bucket/hello?prefix=a/b&max-keys=10",
                    0,
                    None,
                )
                .expect("request must be valid");
                authenticator
                    .authenticate(black_box(req), &cred, version)
                    .expect("must success")
            })
        });

        group.bench_function(format!("{version}_put_64k"), |b| {
            b.iter(|| {
                let req = new_request(
                    Method::PUT,
                    "http://127.0.0.1:9000/bucket/hello",
                    body.len() as u64,
                    Some(Cursor::new(body.as_slice())),
                )
                .expect("request must be valid");
                authenticator
                    .authenticate(black_box(req), &cred, version)
                    .expect("must success")
            })
        });
    }

    group.finish();
}
