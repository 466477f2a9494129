//! JSON decoding for response bodies.
//!
//! Comment threads nest replies without a depth bound, so bodies are decoded
//! with `serde_json`'s recursion limit disabled. The deserializer runs under
//! `serde_stacker`, which grows the stack on demand instead of overflowing
//! on a deep reply chain.

use serde::{Deserialize, de::DeserializeOwned};

use crate::ClientError;

/// Decode a JSON body of any nesting depth.
pub fn from_slice<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    deserializer.disable_recursion_limit();

    let value = <T as Deserialize>::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .map_err(|e| ClientError::Decode(e.to_string()))?;
    deserializer.end().map_err(|e| ClientError::Decode(e.to_string()))?;
    Ok(value)
}
