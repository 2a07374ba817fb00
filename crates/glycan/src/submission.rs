//! The payloads handed to (and received from) the services that draw, convert, and model finished glycans
//!
//! Nothing here talks to the network: a `Submission` only guarantees that there's a sequence worth sending, and a
//! `Reply` only decides whether a service's response was an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{errors::GlycanError, Result, Sequence};

/// A finished sequence, serialized and ready to be sent to a collaborating service
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Submission {
    glycan: String,
}

impl Submission {
    pub fn new(sequence: &Sequence) -> Result<Self> {
        if sequence.is_empty() {
            return Err(GlycanError::EmptySubmission.into());
        }

        let glycan = sequence.serialize();
        debug!(%glycan, "prepared glycan submission");
        Ok(Self { glycan })
    }

    #[must_use]
    pub fn glycan(&self) -> &str {
        &self.glycan
    }

    #[must_use]
    pub fn draw_request(&self) -> DrawRequest<'_> {
        DrawRequest {
            glycan: &self.glycan,
        }
    }

    #[must_use]
    pub fn convert_request(&self) -> ConvertRequest<'_> {
        ConvertRequest {
            glycan: &self.glycan,
            input_format: InputFormat::Iupac,
        }
    }

    #[must_use]
    pub fn structure_request(&self) -> StructureRequest<'_> {
        StructureRequest {
            iupac: &self.glycan,
        }
    }
}

// Requests ============================================================================================================

/// Asks for an SNFG drawing of the glycan
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub struct DrawRequest<'s> {
    glycan: &'s str,
}

/// Asks for the glycan to be converted into other notations
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub struct ConvertRequest<'s> {
    glycan: &'s str,
    input_format: InputFormat,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Iupac,
}

/// Asks for a 3D model of the glycan
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub struct StructureRequest<'s> {
    iupac: &'s str,
}

// Replies =============================================================================================================

/// Whatever a collaborating service sent back: any response with an `error` field is a failure
#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Failed { error: String },
    Succeeded(T),
}

impl<T> Reply<T> {
    /// Surfaces a service's error message exactly as it was sent
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Succeeded(payload) => Ok(payload),
            Self::Failed { error } => {
                debug!(%error, "collaborating service reported an error");
                Err(GlycanError::Collaborator { message: error }.into())
            }
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
pub struct DrawReply {
    /// A base64-encoded PNG
    pub image: String,
}

/// Every notation the glycan was converted into, keyed by format name
pub type ConvertReply = BTreeMap<String, String>;

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
pub struct StructureReply {
    #[serde(rename = "molBlock")]
    pub mol_block: String,
}
