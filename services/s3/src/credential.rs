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

use mintsign_core::utils::Redact;
use mintsign_core::{Error, Result, SigningCredential};
use std::fmt::{Debug, Formatter};

/// Credential that holds the access_key and secret_key.
///
/// An empty access key or secret key makes the credential anonymous:
/// requests signed with it are sent without any authorization.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access key id for s3 services.
    pub access_key_id: String,
    /// Secret access key for s3 services.
    pub secret_access_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
        }
    }

    /// Create an anonymous credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Check if this credential is anonymous.
    pub fn is_anonymous(&self) -> bool {
        self.access_key_id.is_empty() || self.secret_access_key.is_empty()
    }

    /// Check that a non-anonymous credential can be put into an authorization header.
    ///
    /// - The access key must be printable ASCII and must not contain `/`, `:`
    ///   or `,`, which delimit the V2 and V4 authorization fields.
    /// - The secret key must be printable ASCII.
    pub fn check(&self) -> Result<()> {
        let ak_valid = self
            .access_key_id
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b'/' | b':' | b','));
        if !ak_valid {
            return Err(Error::credential_invalid(format!(
                "access key {:?} contains characters not allowed in authorization header",
                Redact::from(&self.access_key_id)
            )));
        }

        if !self.secret_access_key.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(Error::credential_invalid(
                "secret key must only contain printable ascii characters",
            ));
        }

        Ok(())
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    /// Anonymous credentials are not valid for signing.
    ///
    /// A credential with bad characters is still valid here, the signers
    /// reject it with [`Credential::check`] instead of sending it anonymously.
    fn is_valid(&self) -> bool {
        !self.is_anonymous()
    }
}
