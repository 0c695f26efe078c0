//! `Translator`, grounded on
//! `examples/original_source/src/helics/core/TranslatorInfo.hpp`: an object
//! that is simultaneously a publication, an input, and an endpoint, and
//! converts between the value channel and the message channel.

use helics_core::GlobalHandle;

use crate::endpoint::Endpoint;
use crate::input::Input;
use crate::publication::Publication;

#[derive(Debug)]
pub struct Translator {
    pub id: GlobalHandle,
    pub key: String,
    pub publication: Publication,
    pub input: Input,
    pub endpoint: Endpoint,
}

impl Translator {
    pub fn new(id: GlobalHandle, key: impl Into<String>, endpoint_type: impl Into<String>, units: impl Into<String>) -> Self {
        let key = key.into();
        let units = units.into();
        Self {
            id,
            key: key.clone(),
            publication: Publication::new(id, key.clone(), "any", units.clone()),
            input: Input::new(id, key.clone(), "any", units),
            endpoint: Endpoint::new(id, key, endpoint_type),
        }
    }
}
