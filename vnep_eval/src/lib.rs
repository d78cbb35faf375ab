#![deny(rust_2018_idioms)]

// This module contains the definition of all identifiers.
pub mod id;

// This module contains the definition of `ParamValue`.
pub mod value;

// This module contains the definition of `ParameterSpace` and the lookup of
// parameter paths.
pub mod space;

// This module contains the definition of `ScenarioParameterDict` and the
// lookup of scenario identifiers.
pub mod scenario;

// This module contains the definition of the solution objects and of
// `SolutionStorage`.
pub mod solution;

// This module contains the definition of `FilterSpec` and `ScenarioFilter`.
pub mod filter;

// Re-exports.
pub use filter::{
    construct_filter_specs, exclude_generation_parameters, Filter, FilterSpec,
    ScenarioFilter,
};
pub use id::{AlgorithmId, ExecutionId, ScenarioId};
pub use scenario::{GenerationParameter, ScenarioNode, ScenarioParameterDict};
pub use solution::{
    LogData, LogEntry, McfResult, MdkMetaData, RandRoundMetaData, RandRoundResult,
    Resource, RoundingSample, RoundingVariant, ScenarioParameterContainer,
    SolutionStorage, SolverStatus, TemporalLog,
};
pub use space::{ParameterPath, ParameterSpace, PathStep, SpaceNode};
pub use value::ParamValue;

use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerializationFormat {
    Json,
    Bincode,
    BincodeGz,
}

impl SerializationFormat {
    /// Parses a format name as accepted on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Self::Json),
            "bincode" => Some(Self::Bincode),
            "bincode.gz" | "bincode-gz" => Some(Self::BincodeGz),
            _ => None,
        }
    }
}

pub fn serialize<T>(
    data: T,
    file: impl AsRef<Path>,
    format: SerializationFormat,
) -> Result<(), Report>
where
    T: serde::Serialize,
{
    // if the file does not exist it will be created, otherwise truncated
    let file = std::fs::File::create(file).wrap_err("serialize create file")?;
    // create a buf writer
    let buf = std::io::BufWriter::new(file);
    // and try to serialize
    match format {
        SerializationFormat::Json => {
            serde_json::to_writer(buf, &data).wrap_err("serialize json")?
        }
        SerializationFormat::Bincode => {
            bincode::serialize_into(buf, &data).wrap_err("serialize bincode")?
        }
        SerializationFormat::BincodeGz => {
            let mut encoder = GzEncoder::new(buf, Compression::best());
            bincode::serialize_into(&mut encoder, &data)
                .wrap_err("serialize bincode.gz")?;
            encoder.finish().wrap_err("finish gzip stream")?;
        }
    }
    Ok(())
}

pub fn deserialize<T>(
    file: impl AsRef<Path>,
    format: SerializationFormat,
) -> Result<T, Report>
where
    T: serde::de::DeserializeOwned,
{
    // open the file in read-only
    let file = std::fs::File::open(file).wrap_err("deserialize open file")?;
    // create a buf reader
    let buf = std::io::BufReader::new(file);
    // and try to deserialize
    let data = match format {
        SerializationFormat::Json => {
            serde_json::from_reader(buf).wrap_err("deserialize json")?
        }
        SerializationFormat::Bincode => {
            bincode::deserialize_from(buf).wrap_err("deserialize bincode")?
        }
        SerializationFormat::BincodeGz => {
            let decoder = GzDecoder::new(buf);
            bincode::deserialize_from(decoder)
                .wrap_err("deserialize bincode.gz")?
        }
    };
    Ok(data)
}
